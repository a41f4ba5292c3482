use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Empty query text, zero limit, or malformed weights. Surfaced to the
    /// caller immediately, never retried.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Embedding provider or vector index unreachable. Recoverable on the
    /// read path as long as the lexical signal can compensate.
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// A ranked id no longer resolves to a stored document. Logged at debug
    /// and the item dropped; never propagated.
    #[error("Stale reference: no document for id '{id}'")]
    StaleReference { id: String },

    /// Write-side sync failed to embed or upsert an artifact. Logged for
    /// retry, never returned to the writer.
    #[error("Vectorization failed for '{id}': {reason}")]
    VectorizationFailed { id: String, reason: String },

    /// Internal index misuse, e.g. an embedding of the wrong dimension.
    #[error("Index error: {0}")]
    Index(String),
}

pub type Result<T> = std::result::Result<T, Error>;
