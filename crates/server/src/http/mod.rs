#![forbid(unsafe_code)]

mod query;
mod request;
mod response;

pub(crate) use query::*;
pub(crate) use request::*;
pub(crate) use response::*;
