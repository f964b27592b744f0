#![forbid(unsafe_code)]

mod clock;
mod crash;
mod logging;

pub(crate) use clock::*;
pub(crate) use crash::*;
pub(crate) use logging::*;
