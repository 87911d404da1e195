// Business logic services
pub mod leader_service;

pub use leader_service::*;
