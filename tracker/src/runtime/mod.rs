mod actions;
mod commands;
mod event_loop;

pub use actions::App;
pub use commands::{Command, HELP};
pub use event_loop::run_app;
