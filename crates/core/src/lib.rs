#![forbid(unsafe_code)]

//! Domain types and validation rules for the task list service.
//!
//! Everything here is storage-agnostic: the SQLite layer and the HTTP layer both
//! call into these helpers so a name, status or due date is validated the same way
//! regardless of how it arrived.

mod error;
pub mod model;
pub mod validate;

pub use error::ValidationError;
pub use model::{Category, CategoryRef, Priority, Task, TaskStatus};
