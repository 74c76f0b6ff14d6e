mod api;
mod client;
mod reshape;

pub use api::*;
pub use client::*;
pub use reshape::*;
