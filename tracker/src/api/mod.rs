mod dev_backend;
mod port;

pub use dev_backend::DevBackend;
pub use port::{Connect, TimeTrackingApi};
