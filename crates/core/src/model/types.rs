#![forbid(unsafe_code)]

use super::{Priority, TaskStatus};
use crate::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub status: TaskStatus,
    pub category_id: i64,
    /// Filled when the row was read through the category join.
    pub category_name: Option<String>,
    pub priority: Priority,
    /// Canonical `YYYY-MM-DDTHH:MM`.
    pub due_at: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub completed_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// A category given either by numeric id or by name, as HTML forms and JSON
/// clients send both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryRef {
    Id(i64),
    Name(String),
}

impl CategoryRef {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if value.bytes().all(|b| b.is_ascii_digit()) {
            return value
                .parse::<i64>()
                .map(Self::Id)
                .map_err(|_| ValidationError::MissingCategory);
        }
        Ok(Self::Name(value.to_string()))
    }
}

impl From<i64> for CategoryRef {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ref_distinguishes_ids_from_names() {
        assert_eq!(CategoryRef::parse(" 12 "), Ok(CategoryRef::Id(12)));
        assert_eq!(
            CategoryRef::parse("Hogar"),
            Ok(CategoryRef::Name("Hogar".to_string()))
        );
        assert_eq!(
            CategoryRef::parse("12b"),
            Ok(CategoryRef::Name("12b".to_string()))
        );
        assert_eq!(CategoryRef::parse("   "), Err(ValidationError::MissingCategory));
    }

    #[test]
    fn category_ref_rejects_ids_that_overflow() {
        assert_eq!(
            CategoryRef::parse("99999999999999999999999"),
            Err(ValidationError::MissingCategory)
        );
    }
}
