pub mod api;
pub mod bootstrap;
pub mod browse;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod prompt;
pub mod runtime;
pub mod settings;
pub mod time_utils;
pub mod tracking;
pub mod view;

pub use error::TrackerError;
