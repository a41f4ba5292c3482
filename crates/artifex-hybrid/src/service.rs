//! The retrieval service: ties the embedding provider, vector index,
//! lexical matcher and fusion engine together behind `search` / `similar`
//! and the write-side index sync.

use std::sync::Arc;

use artifex_core::error::{Error, Result};
use artifex_core::traits::{DocumentStore, EmbeddingProvider};
use artifex_core::types::{
    template_eligible, ArtifactDoc, CandidateItem, Filters, IndexMeta, QuerySpec, RankedResult,
    SearchOutcome, SourceKind, VectorHit, Weights,
};
use artifex_vector::VectorIndex;

use crate::fusion::fuse;

/// Tunables injected at construction; see `RetrievalConfig` for the
/// figment-backed variant the CLI loads.
#[derive(Debug, Clone, Copy)]
pub struct RetrieverOptions {
    pub score_threshold: f32,
}

impl Default for RetrieverOptions {
    fn default() -> Self {
        Self { score_threshold: 0.1 }
    }
}

pub struct Retriever<S> {
    index: VectorIndex,
    store: Arc<S>,
    embedder: Box<dyn EmbeddingProvider>,
    options: RetrieverOptions,
}

impl<S> Retriever<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>, embedder: Box<dyn EmbeddingProvider>, options: RetrieverOptions) -> Self {
        let index = VectorIndex::new(embedder.dim());
        Self { index, store, embedder, options }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Hybrid query: the vector and lexical paths run concurrently and are
    /// joined by fusion. A dead embedding provider degrades the response to
    /// lexical-only rather than failing it; only both paths failing
    /// surfaces an error.
    pub async fn search(&self, spec: &QuerySpec) -> Result<SearchOutcome> {
        spec.validate()?;

        let vector_path = self.vector_hits(&spec.text, &spec.filters, spec.limit);
        let text_path = artifex_lexical::search(self.store.as_ref(), &spec.text, &spec.filters, spec.limit);
        let (vector_res, text_res) = futures::join!(vector_path, text_path);

        let mut degraded = false;
        let vector_hits = match vector_res {
            Ok(hits) => hits,
            Err(Error::DependencyUnavailable(reason)) => {
                tracing::warn!(%reason, "vector path unavailable, serving lexical-only results");
                degraded = true;
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let text_hits = match text_res {
            Ok(hits) => hits,
            Err(e) if degraded => {
                return Err(Error::DependencyUnavailable(format!(
                    "both retrieval paths failed: {e}"
                )))
            }
            Err(e) => {
                tracing::warn!(error = %e, "lexical path failed, serving vector-only results");
                degraded = true;
                Vec::new()
            }
        };

        let candidates = fuse(&vector_hits, &text_hits, spec.weights, spec.limit);
        let results = self.enrich(candidates).await?;
        Ok(SearchOutcome { results, degraded })
    }

    /// "More like this": query the index with the stored embedding of
    /// `id` (re-embedding its text when the vector is not indexed), with
    /// the source item excluded. Scores are raw similarities.
    pub async fn similar(&self, id: &str, limit: usize, filters: &Filters) -> Result<SearchOutcome> {
        if limit == 0 {
            return Err(Error::InvalidQuery("limit must be positive".into()));
        }
        let query_vec = match self.index.vector_of(id) {
            Some(v) => v,
            None => {
                let doc = self
                    .lookup_any(id)
                    .await?
                    .ok_or_else(|| Error::InvalidQuery(format!("unknown artifact id '{id}'")))?;
                self.embedder.embed(&synthetic_document(&doc)).await?
            }
        };
        let hits = self
            .index
            .query(&query_vec, filters, limit, self.options.score_threshold, Some(id))?;
        let candidates = fuse(&hits, &[], Weights { vector: 1.0, text: 0.0 }, limit);
        let results = self.enrich(candidates).await?;
        Ok(SearchOutcome { results, degraded: false })
    }

    /// Write-side sync entry point. Embeds the artifact's text surface and
    /// upserts it, tagged with its collection; an ineligible project
    /// instead sheds any stale index entry left by an earlier state.
    pub async fn index_upsert(&self, source: SourceKind, doc: &ArtifactDoc) -> Result<()> {
        if !template_eligible(source, doc) {
            self.index.remove(&doc.id);
            return Ok(());
        }
        let text = synthetic_document(doc);
        let embedding = self.embedder.embed(&text).await.map_err(|e| Error::VectorizationFailed {
            id: doc.id.clone(),
            reason: e.to_string(),
        })?;
        self.index
            .upsert(&doc.id, source, embedding, IndexMeta::of(doc))
            .map_err(|e| Error::VectorizationFailed { id: doc.id.clone(), reason: e.to_string() })
    }

    pub fn index_remove(&self, id: &str) {
        self.index.remove(id);
    }

    /// Fire-and-forget sync for write handlers: the triggering write must
    /// never fail or wait on vectorization. Failures are logged for retry.
    /// The handle is returned so tests can await completion.
    pub fn spawn_sync(this: &Arc<Self>, source: SourceKind, doc: ArtifactDoc) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(this);
        tokio::spawn(async move {
            if let Err(e) = this.index_upsert(source, &doc).await {
                tracing::warn!(error = %e, "index sync failed, write not affected");
            }
        })
    }

    async fn vector_hits(&self, text: &str, filters: &Filters, limit: usize) -> Result<Vec<VectorHit>> {
        let query_vec = self.embedder.embed(text).await?;
        self.index.query(&query_vec, filters, limit, self.options.score_threshold, None)
    }

    /// Resolve ranked pairs back to full records with exactly two batched
    /// lookups, one per collection. Ids the store no longer knows are
    /// dropped; a stale index is expected, not an error.
    async fn enrich(&self, candidates: Vec<CandidateItem>) -> Result<Vec<RankedResult>> {
        let ids_of = |kind: SourceKind| -> Vec<String> {
            candidates.iter().filter(|c| c.source == kind).map(|c| c.id.clone()).collect()
        };
        let template_ids = ids_of(SourceKind::Template);
        let project_ids = ids_of(SourceKind::Project);
        let (templates, projects) = futures::join!(
            self.store.find_by_ids(SourceKind::Template, &template_ids),
            self.store.find_by_ids(SourceKind::Project, &project_ids),
        );

        let mut found: std::collections::HashMap<(SourceKind, String), ArtifactDoc> =
            std::collections::HashMap::new();
        for doc in templates? {
            found.insert((SourceKind::Template, doc.id.clone()), doc);
        }
        for doc in projects? {
            found.insert((SourceKind::Project, doc.id.clone()), doc);
        }

        let mut results = Vec::with_capacity(candidates.len());
        for c in candidates {
            match found.remove(&(c.source, c.id.clone())) {
                Some(doc) => results.push(RankedResult {
                    doc,
                    source: c.source,
                    combined_score: c.combined_score,
                    vector_score: c.vector_score,
                    text_score: c.text_score,
                }),
                None => {
                    let stale = Error::StaleReference { id: c.id };
                    tracing::debug!(error = %stale, "dropping ranked item with no backing document");
                }
            }
        }
        Ok(results)
    }

    async fn lookup_any(&self, id: &str) -> Result<Option<ArtifactDoc>> {
        let ids = [id.to_string()];
        for kind in [SourceKind::Template, SourceKind::Project] {
            if let Some(doc) = self.store.find_by_ids(kind, &ids).await?.into_iter().next() {
                return Ok(Some(doc));
            }
        }
        Ok(None)
    }
}

/// The text surface that gets embedded: title, description, tags and
/// category concatenated into one synthetic document.
pub fn synthetic_document(doc: &ArtifactDoc) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(4 + doc.tags.len());
    parts.push(doc.title.as_str());
    if !doc.description.is_empty() {
        parts.push(doc.description.as_str());
    }
    for tag in &doc.tags {
        parts.push(tag.as_str());
    }
    if !doc.category.is_empty() {
        parts.push(doc.category.as_str());
    }
    parts.join(" ")
}
