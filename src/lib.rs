pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod proxy;
pub mod session;
