use thiserror::Error as ThisError;

use super::validation::ValidationError;

#[derive(Debug, ThisError)]
pub enum InventoryError {
    #[error("Unsupported address: {0}")]
    UnsupportedAddress(String),

    #[error("{operation} is not supported for {address}")]
    UnsupportedOperation {
        operation: &'static str,
        address: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaDowngrade { found: i64, supported: i64 },

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),
}

/// Coarse classification handed to callers deciding how to surface a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedAddress,
    UnsupportedOperation,
    Validation,
    Storage,
    Config,
}

impl InventoryError {
    pub(crate) fn unsupported_operation(operation: &'static str, address: &url::Url) -> Self {
        InventoryError::UnsupportedOperation {
            operation,
            address: address.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::UnsupportedAddress(_) => ErrorKind::UnsupportedAddress,
            InventoryError::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            InventoryError::Validation(_) => ErrorKind::Validation,
            InventoryError::DatabaseError(_)
            | InventoryError::SchemaDowngrade { .. }
            | InventoryError::RactorError(_) => ErrorKind::Storage,
            InventoryError::ConfigError(_) => ErrorKind::Config,
        }
    }
}

impl From<figment::Error> for InventoryError {
    fn from(e: figment::Error) -> Self {
        InventoryError::ConfigError(Box::new(e))
    }
}
