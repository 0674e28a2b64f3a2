use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanbookError {
    #[error("Not in a planbook directory. Run 'planbook init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .planbook/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Import failed: {0}")]
    InvalidImport(String),

    #[error("Storage quota exceeded: writing '{key}' needs {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("Use --force to {0} in non-interactive mode")]
    ConfirmationRequired(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PlanbookError>;
