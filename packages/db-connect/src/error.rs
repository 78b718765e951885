use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbConnectError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Connection error: {detail}")]
    Connection { detail: String },
}

impl DbConnectError {
    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn connection(detail: String) -> Self {
        Self::Connection { detail }
    }
}
