use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ArtifactDoc, Filters, SourceKind};

/// Opaque text-to-vector function. Implementations fail with
/// `Error::DependencyUnavailable` when the backing model or service is
/// unreachable; callers on the read path degrade rather than abort.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn dim(&self) -> usize;
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Narrow view of the document store consumed by the retrieval core.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Batched lookup. Missing ids are omitted, not errors; the returned
    /// order follows the requested id order.
    async fn find_by_ids(&self, kind: SourceKind, ids: &[String]) -> Result<Vec<ArtifactDoc>>;

    /// All records of one collection satisfying `filters`, in the store's
    /// natural insertion order.
    async fn scan(&self, kind: SourceKind, filters: &Filters) -> Result<Vec<ArtifactDoc>>;
}
