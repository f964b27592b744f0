#![forbid(unsafe_code)]

use crate::validate::{MAX_CATEGORY_NAME_CHARS, MAX_TASK_NAME_CHARS};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task name is required")]
    MissingTaskName,
    #[error("task name must be at most {} characters", MAX_TASK_NAME_CHARS)]
    TaskNameTooLong,
    #[error("a valid category must be selected")]
    MissingCategory,
    #[error("category name is required")]
    MissingCategoryName,
    #[error("category name must be at most {} characters", MAX_CATEGORY_NAME_CHARS)]
    CategoryNameTooLong,
    #[error("status must be one of: pendiente, en_progreso, completada (got {value:?})")]
    InvalidStatus { value: String },
    #[error("priority must be one of: baja, media, alta (got {value:?})")]
    InvalidPriority { value: String },
    #[error("estimated time must be a non-negative integer")]
    NegativeEstimate,
    #[error("due date has an invalid format (got {value:?})")]
    InvalidDueDate { value: String },
}

impl ValidationError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTaskName | Self::MissingCategoryName | Self::MissingCategory => {
                "MISSING_FIELD"
            }
            Self::TaskNameTooLong | Self::CategoryNameTooLong => "TOO_LONG",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::InvalidPriority { .. } => "INVALID_PRIORITY",
            Self::NegativeEstimate => "INVALID_ESTIMATE",
            Self::InvalidDueDate { .. } => "INVALID_DUE_DATE",
        }
    }
}
