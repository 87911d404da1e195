// Background jobs
pub mod activity_simulator;
