//! Domain types shared by the index, matcher and fusion engines.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type ArtifactId = String;

/// Which backing collection an id resolves against. The two collections
/// may share an id by coincidence, never by design, so every candidate
/// carries its kind from index to enrichment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Template,
    Project,
}

/// The stored record both collections share.
///
/// - `id`: unique within its collection
/// - `title`/`description`/`tags`/`category`: the text surface that is
///   embedded and lexically matched
/// - `artifact_type`/`aspect_ratio`: filterable facets
/// - `starred`: marks a project as template-eligible regardless of type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDoc {
    pub id: ArtifactId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub artifact_type: String,
    #[serde(default)]
    pub aspect_ratio: String,
    #[serde(default)]
    pub starred: bool,
}

/// A project doubles as a template when it is starred or carries a
/// non-stock type. Templates are always eligible.
pub fn template_eligible(kind: SourceKind, doc: &ArtifactDoc) -> bool {
    match kind {
        SourceKind::Template => true,
        SourceKind::Project => {
            doc.starred || !matches!(doc.artifact_type.as_str(), "default" | "custom")
        }
    }
}

/// Field-level constraints applied identically to the vector and lexical
/// paths, so neither path can leak items the other would exclude.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filters {
    pub category: Option<String>,
    pub aspect_ratio: Option<String>,
    pub artifact_type: Option<String>,
}

/// The filterable facets stored alongside a vector in the index. Built
/// from the same document fields the lexical path filters on, so one
/// predicate serves both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMeta {
    pub category: String,
    pub aspect_ratio: String,
    pub artifact_type: String,
}

impl IndexMeta {
    pub fn of(doc: &ArtifactDoc) -> Self {
        Self {
            category: doc.category.clone(),
            aspect_ratio: doc.aspect_ratio.clone(),
            artifact_type: doc.artifact_type.clone(),
        }
    }
}

impl Filters {
    pub fn matches_meta(&self, meta: &IndexMeta) -> bool {
        if let Some(c) = &self.category {
            if &meta.category != c {
                return false;
            }
        }
        if let Some(r) = &self.aspect_ratio {
            if &meta.aspect_ratio != r {
                return false;
            }
        }
        if let Some(t) = &self.artifact_type {
            if &meta.artifact_type != t {
                return false;
            }
        }
        true
    }

    pub fn matches(&self, doc: &ArtifactDoc) -> bool {
        self.matches_meta(&IndexMeta::of(doc))
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.aspect_ratio.is_none() && self.artifact_type.is_none()
    }
}

/// Per-path weights. Deliberately not normalized to sum to 1; with both
/// weights zero neither path contributes and the result set is empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weights {
    pub vector: f32,
    pub text: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self { vector: 0.7, text: 0.3 }
    }
}

/// The input contract of a retrieval request.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub text: String,
    pub filters: Filters,
    pub limit: usize,
    pub weights: Weights,
}

impl QuerySpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), filters: Filters::default(), limit: 20, weights: Weights::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::InvalidQuery("query text must be non-empty".into()));
        }
        if self.limit == 0 {
            return Err(Error::InvalidQuery("limit must be positive".into()));
        }
        for (name, w) in [("vector", self.weights.vector), ("text", self.weights.text)] {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::InvalidQuery(format!("{name} weight must be finite and >= 0, got {w}")));
            }
        }
        Ok(())
    }
}

/// A scored hit out of the vector index. `score` is cosine similarity in
/// [0,1], pre-weighting; the list arrives ordered by score then recency.
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub id: ArtifactId,
    pub source: SourceKind,
    pub score: f32,
}

/// An unscored lexical hit; rank position in the list is its only signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextHit {
    pub id: ArtifactId,
    pub source: SourceKind,
}

/// An intermediate, scored reference produced by fusion. `(id, source)` is
/// unique within one fusion pass; `combined_score` is recomputed per query
/// and never persisted.
#[derive(Debug, Clone)]
pub struct CandidateItem {
    pub id: ArtifactId,
    pub source: SourceKind,
    pub vector_score: Option<f32>,
    pub text_score: Option<f32>,
    pub combined_score: f32,
}

/// An enriched, final result: the full record plus score provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub doc: ArtifactDoc,
    pub source: SourceKind,
    pub combined_score: f32,
    pub vector_score: Option<f32>,
    pub text_score: Option<f32>,
}

/// The response contract. `degraded` is set when the vector path failed
/// and the results are lexical-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<RankedResult>,
    pub degraded: bool,
}
