pub mod build;
pub mod cli;
pub mod config;
pub mod engine;
pub mod helpers;
pub mod watcher;
