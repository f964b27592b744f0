#![forbid(unsafe_code)]

use crate::ValidationError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::InProgress => "en_progreso",
            Self::Completed => "completada",
        }
    }

    /// Accepts the canonical wire strings plus the spellings older clients sent
    /// (`"en progreso"`, `"listo"`).
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "pendiente" => Ok(Self::Pending),
            "en_progreso" | "en progreso" | "en-progreso" => Ok(Self::InProgress),
            "completada" | "listo" => Ok(Self::Completed),
            _ => Err(ValidationError::InvalidStatus {
                value: raw.trim().to_string(),
            }),
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }

    /// Completed goes back to pending; everything else is marked done.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "baja",
            Self::Medium => "media",
            Self::High => "alta",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "baja" => Ok(Self::Low),
            "media" => Ok(Self::Medium),
            "alta" => Ok(Self::High),
            _ => Err(ValidationError::InvalidPriority {
                value: raw.trim().to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
