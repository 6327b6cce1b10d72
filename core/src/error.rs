use std::path::PathBuf;

/// Every failure the record store can report to its caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("todo content must not be empty")]
    EmptyContent,
    #[error("expense item must not be empty")]
    EmptyItem,
    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid amount `{0}` (expected a non-negative number with at most two decimals)")]
    InvalidAmount(String),
    #[error("index {index} is out of range (have {len} item(s))")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("store file `{}` is corrupt: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read store file `{}`: {source}", .path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to persist store file `{}`: {source}", .path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
