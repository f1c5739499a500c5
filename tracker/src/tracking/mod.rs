//! Local view of what is being tracked, reconciled against ClickUp.

mod controller;
mod resolve;
mod state;

pub use controller::*;
pub use resolve::*;
pub use state::*;
