//! In-memory nearest-neighbor index over artifact embeddings.
//!
//! Stores `(id, source, vector, meta)` entries keyed by id. Vectors are
//! L2-normalized on the way in, so similarity is a clamped dot product.
//! Ties at equal similarity break toward the most recently upserted entry;
//! the tie-break is a stated policy, not an accident of iteration order.

use std::collections::HashMap;
use std::sync::RwLock;

use artifex_core::error::{Error, Result};
use artifex_core::types::{Filters, IndexMeta, SourceKind, VectorHit};

struct Entry {
    source: SourceKind,
    vector: Vec<f32>,
    meta: IndexMeta,
    seq: u64,
}

#[derive(Default)]
struct State {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

pub struct VectorIndex {
    dim: usize,
    state: RwLock<State>,
}

impl VectorIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, state: RwLock::new(State::default()) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn check_dim(&self, v: &[f32]) -> Result<()> {
        if v.len() != self.dim {
            return Err(Error::Index(format!(
                "embedding dimension {} does not match index dimension {}",
                v.len(),
                self.dim
            )));
        }
        Ok(())
    }

    /// Insert or replace the entry for `id`. Repeated upserts overwrite in
    /// place and refresh recency; they never duplicate.
    pub fn upsert(&self, id: &str, source: SourceKind, embedding: Vec<f32>, meta: IndexMeta) -> Result<()> {
        self.check_dim(&embedding)?;
        let vector = normalize(embedding);
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(id.to_string(), Entry { source, vector, meta, seq });
        Ok(())
    }

    /// Delete the entry for `id`. Absent ids are a no-op.
    pub fn remove(&self, id: &str) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.entries.remove(id).is_none() {
            tracing::debug!(id, "remove on absent id, ignoring");
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read().unwrap_or_else(|e| e.into_inner()).entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.state.read().unwrap_or_else(|e| e.into_inner()).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored (normalized) embedding for `id`, if indexed.
    pub fn vector_of(&self, id: &str) -> Option<Vec<f32>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.entries.get(id).map(|e| e.vector.clone())
    }

    /// Up to `limit` entries with similarity >= `score_threshold` whose
    /// metadata satisfies `filters`, best first. `exclude` drops one id
    /// (the source item of a similar-items query).
    pub fn query(
        &self,
        query_vec: &[f32],
        filters: &Filters,
        limit: usize,
        score_threshold: f32,
        exclude: Option<&str>,
    ) -> Result<Vec<VectorHit>> {
        self.check_dim(query_vec)?;
        let q = normalize(query_vec.to_vec());
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());

        let mut scored: Vec<(f32, u64, VectorHit)> = Vec::new();
        for (id, entry) in &state.entries {
            if exclude == Some(id.as_str()) {
                continue;
            }
            if !filters.matches_meta(&entry.meta) {
                continue;
            }
            // clamp: negative similarity carries no signal
            let score = dot(&q, &entry.vector).clamp(0.0, 1.0);
            if score < score_threshold {
                continue;
            }
            scored.push((score, entry.seq, VectorHit { id: id.clone(), source: entry.source, score }));
        }
        // score desc, then newest first
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(b.1.cmp(&a.1))
        });
        scored.truncate(limit);
        Ok(scored.into_iter().map(|(_, _, hit)| hit).collect())
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt();
    if norm > 1e-9 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
