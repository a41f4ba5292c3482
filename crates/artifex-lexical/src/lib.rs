//! Substring matcher over the document store.
//!
//! Deliberately crude: a case-insensitive substring scan across title,
//! category and tags, ordered by the store's insertion order. It exists to
//! rescue near-matches the embedding missed (exact brand names, product
//! codes), not to be a full-text engine. Scoring by rank position happens
//! downstream in fusion.

use artifex_core::error::Result;
use artifex_core::traits::DocumentStore;
use artifex_core::types::{template_eligible, ArtifactDoc, Filters, SourceKind, TextHit};

fn doc_matches(doc: &ArtifactDoc, needle: &str) -> bool {
    doc.title.to_lowercase().contains(needle)
        || doc.category.to_lowercase().contains(needle)
        || doc.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Up to `limit` textual hits for `text`, templates first, then
/// template-eligible projects, each collection in scan order.
pub async fn search<S>(store: &S, text: &str, filters: &Filters, limit: usize) -> Result<Vec<TextHit>>
where
    S: DocumentStore + ?Sized,
{
    let needle = text.trim().to_lowercase();
    let mut hits = Vec::new();
    if needle.is_empty() {
        return Ok(hits);
    }

    for kind in [SourceKind::Template, SourceKind::Project] {
        if hits.len() >= limit {
            break;
        }
        for doc in store.scan(kind, filters).await? {
            if !template_eligible(kind, &doc) {
                continue;
            }
            if doc_matches(&doc, &needle) {
                hits.push(TextHit { id: doc.id, source: kind });
                if hits.len() >= limit {
                    break;
                }
            }
        }
    }
    Ok(hits)
}
