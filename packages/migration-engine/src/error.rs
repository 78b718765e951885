use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error("Invalid migration file '{file}': {detail}")]
    InvalidFile { file: String, detail: String },
    #[error("Failed to apply migration '{file}': {detail}")]
    Apply { file: String, detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
}

impl MigrationError {
    pub fn io(detail: String) -> Self {
        Self::Io { detail }
    }

    pub fn invalid_file(file: String, detail: String) -> Self {
        Self::InvalidFile { file, detail }
    }

    pub fn apply(file: String, detail: String) -> Self {
        Self::Apply { file, detail }
    }

    pub fn db(detail: String) -> Self {
        Self::Db { detail }
    }
}
