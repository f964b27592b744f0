#![forbid(unsafe_code)]

use todo_core::{CategoryRef, Priority, TaskStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskCreateRequest {
    pub name: String,
    pub category: CategoryRef,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// Raw due date; normalized by the store.
    pub due_at: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub now_ms: i64,
}

/// Partial update. `None` leaves a field untouched; `Some(None)` clears an
/// optional column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskUpdateRequest {
    pub name: Option<String>,
    pub category: Option<CategoryRef>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_at: Option<Option<String>>,
    pub estimated_minutes: Option<Option<i64>>,
}

impl TaskUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_at.is_none()
            && self.estimated_minutes.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category_id: Option<i64>,
    pub priority: Option<Priority>,
    /// Case-insensitive (ASCII) substring of the task name.
    pub text: Option<String>,
    /// Inclusive lower bound on the due date; raw, normalized by the store.
    pub due_from: Option<String>,
    /// Inclusive upper bound on the due date; a bare date covers that whole day.
    pub due_until: Option<String>,
    pub sort: TaskSort,
    pub descending: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskSort {
    #[default]
    Id,
    Name,
    Priority,
    Status,
    Created,
    Due,
}

impl TaskSort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "nombre" => Some(Self::Name),
            "prioridad" => Some(Self::Priority),
            "estado" => Some(Self::Status),
            "fecha_creacion" | "created_at" => Some(Self::Created),
            "fecha_limite" => Some(Self::Due),
            _ => None,
        }
    }

    pub(super) fn order_by(self) -> &'static str {
        match self {
            Self::Id => "t.id",
            Self::Name => "t.name COLLATE NOCASE",
            Self::Priority => {
                "CASE t.priority WHEN 'baja' THEN 1 WHEN 'media' THEN 2 WHEN 'alta' THEN 3 ELSE 0 END"
            }
            Self::Status => {
                "CASE t.status WHEN 'pendiente' THEN 1 WHEN 'en_progreso' THEN 2 WHEN 'completada' THEN 3 ELSE 0 END"
            }
            Self::Created => "t.created_at_ms",
            Self::Due => "t.due_at",
        }
    }
}
