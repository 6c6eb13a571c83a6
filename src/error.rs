use thiserror::Error;

/// Failure taxonomy for catalog operations.
///
/// Every variant is recoverable at the point of the failing operation;
/// `load`/`refresh` callers observe an `Err` and keep whatever data they
/// already had.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network unreachable, timeout, or a non-2xx response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The underlying store failed to read, write, or delete.
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),
}
