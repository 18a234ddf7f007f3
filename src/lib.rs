pub mod config;
pub mod error;
pub mod photos;
pub mod server;
pub mod vision;
