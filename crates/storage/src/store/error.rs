#![forbid(unsafe_code)]

use todo_core::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unknown id")]
    UnknownId,
    #[error("the selected category does not exist")]
    UnknownCategory,
    #[error("a category with that name already exists")]
    CategoryExists,
    #[error("category still has tasks and cannot be deleted")]
    CategoryInUse,
    #[error("integrity constraint violated: {0}")]
    Integrity(&'static str),
    #[error("schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: i64, supported: i64 },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO_ERROR",
            Self::Sql(_) => "STORE_ERROR",
            Self::Validation(err) => err.code(),
            Self::UnknownId => "UNKNOWN_ID",
            Self::UnknownCategory => "UNKNOWN_CATEGORY",
            Self::CategoryExists => "CATEGORY_EXISTS",
            Self::CategoryInUse => "CATEGORY_IN_USE",
            Self::Integrity(_) => "INTEGRITY",
            Self::SchemaTooNew { .. } => "SCHEMA_TOO_NEW",
        }
    }
}
