#![forbid(unsafe_code)]

mod due;

pub use due::*;

use crate::ValidationError;

pub const MAX_TASK_NAME_CHARS: usize = 200;
pub const MAX_CATEGORY_NAME_CHARS: usize = 80;

pub fn validate_task_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingTaskName);
    }
    if name.chars().count() > MAX_TASK_NAME_CHARS {
        return Err(ValidationError::TaskNameTooLong);
    }
    Ok(name.to_string())
}

pub fn validate_category_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingCategoryName);
    }
    if name.chars().count() > MAX_CATEGORY_NAME_CHARS {
        return Err(ValidationError::CategoryNameTooLong);
    }
    Ok(name.to_string())
}

pub fn validate_estimated_minutes(value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeEstimate);
    }
    Ok(value)
}

/// Form fields arrive as text; accept `"45"` as well as `45`.
pub fn parse_estimated_minutes(raw: &str) -> Result<Option<i64>, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let parsed = value
        .parse::<i64>()
        .map_err(|_| ValidationError::NegativeEstimate)?;
    validate_estimated_minutes(parsed).map(Some)
}

#[cfg(test)]
mod tests;
