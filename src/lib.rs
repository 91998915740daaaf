pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod media;
pub mod progress;
pub mod render;
pub mod session;
