pub mod account;
pub mod config;
pub mod errors;
pub mod permissions;
