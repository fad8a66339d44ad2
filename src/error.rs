use serde::Serialize;
use thiserror::Error;

/// Error categories surfaced to callers as the `kind` of an error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    StorageError,
    InvalidArgument,
    NotFound,
}

#[derive(Error, Debug)]
pub enum SpendingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("User {user_id} is already registered")]
    Conflict { user_id: u64 },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("User {user_id} not found")]
    NotFound { user_id: u64 },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}

impl SpendingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpendingError::InvalidInput(_) | SpendingError::Csv(_) | SpendingError::Json(_) => {
                ErrorKind::InvalidInput
            }
            SpendingError::Conflict { .. } => ErrorKind::Conflict,
            SpendingError::Storage(_) | SpendingError::Io(_) => ErrorKind::StorageError,
            #[cfg(feature = "storage-rocksdb")]
            SpendingError::RocksDb(_) => ErrorKind::StorageError,
            SpendingError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SpendingError::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpendingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            SpendingError::InvalidInput("bad".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            SpendingError::Conflict { user_id: 1 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            SpendingError::Storage("disk".into()).kind(),
            ErrorKind::StorageError
        );
        assert_eq!(
            SpendingError::InvalidArgument("n".into()).kind(),
            ErrorKind::InvalidArgument
        );

        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(
            SpendingError::from(json_err).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_conflict_message_names_user() {
        let err = SpendingError::Conflict { user_id: 42 };
        assert_eq!(err.to_string(), "User 42 is already registered");
    }
}
