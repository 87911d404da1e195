pub mod demo_users_seed;
