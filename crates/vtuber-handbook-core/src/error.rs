use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure channel of every [`CatalogStore`](crate::store::CatalogStore) call.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The store has no usable connection (never opened, or closed).
    #[error("catalog is not open")]
    NotReady,
    /// The dataset file is missing, corrupt or could not be opened.
    #[error("catalog connection error: {0}")]
    Connection(String),
    #[error("catalog query failed: {0}")]
    Query(String),
    /// A row could not be mapped into a typed record.
    #[error("catalog row decode failed: {0}")]
    Decode(String),
}
