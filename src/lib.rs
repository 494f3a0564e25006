pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod market;
pub mod shell;
pub mod shutdown;
pub mod view;
