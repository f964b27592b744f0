#![forbid(unsafe_code)]

mod status;
mod types;

pub use status::*;
pub use types::*;
