pub mod api;
pub mod cli;
pub mod config;
pub mod render;
pub mod session;
pub mod utils;
