mod hierarchy;
mod task;
mod time_entry;
mod user;

pub use hierarchy::*;
pub use task::*;
pub use time_entry::*;
pub use user::*;
