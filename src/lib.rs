pub mod config;
pub mod dashboard;
pub mod export;
pub mod server;
pub mod statement;
