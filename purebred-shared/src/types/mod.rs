pub mod api;
pub mod id;

pub use api::*;
pub use id::*;
