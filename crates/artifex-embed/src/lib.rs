//! Embedding providers.
//!
//! The retrieval core treats embedding as an opaque collaborator behind
//! [`EmbeddingProvider`]. The in-tree provider is a deterministic feature
//! hasher: fully offline, stable across runs, L2-normalized. A hosted
//! model slots in by implementing the same trait.

use async_trait::async_trait;

use artifex_core::error::{Error, Result};
use artifex_core::traits::EmbeddingProvider;

/// Hashed bag-of-words embedder. Each whitespace token is hashed into one
/// of `dim` buckets with a magnitude derived from the hash, then the
/// vector is L2-normalized. Identical text always maps to the identical
/// vector.
pub struct HashedEmbedder {
    dim: usize,
}

impl HashedEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl EmbeddingProvider for HashedEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        if text.trim().is_empty() {
            return Err(Error::InvalidQuery("cannot embed empty text".into()));
        }
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += 0.25 + val;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}

/// Provider that is always down. Stands in for a hosted model during an
/// outage so the degraded read path can be exercised.
pub struct OfflineProvider {
    dim: usize,
}

impl OfflineProvider {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl EmbeddingProvider for OfflineProvider {
    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::DependencyUnavailable("embedding provider unreachable".into()))
    }
}

/// Default provider for the current configuration. The hashed embedder is
/// the only in-tree model; `dim` comes from `RetrievalConfig::embed_dim`.
pub fn default_provider(dim: usize) -> Box<dyn EmbeddingProvider> {
    tracing::debug!(dim, "using hashed feature embedder");
    Box::new(HashedEmbedder::new(dim))
}
