mod auth;
mod client;
mod clickup_url;
pub mod domain;

pub use auth::*;
pub use clickup_url::*;
pub use client::*;
pub use domain::*;
