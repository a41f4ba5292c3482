//! Result fusion: two scored candidate streams in, one ordered list out.
//!
//! A pure function over its inputs; no clock, no index handle, no shared
//! state, so every ranking property is unit-testable in isolation.

use std::collections::HashMap;

use artifex_core::types::{ArtifactId, CandidateItem, SourceKind, TextHit, VectorHit, Weights};

#[derive(Default)]
struct Slot {
    vector_score: Option<f32>,
    text_score: Option<f32>,
    // arrival ordinals; the vector list is already ordered by score then
    // recency, the text list by scan order
    vector_rank: Option<usize>,
    text_rank: Option<usize>,
}

impl Slot {
    fn corroborated(&self) -> bool {
        self.vector_score.is_some() && self.text_score.is_some()
    }

    fn combined(&self) -> f32 {
        self.vector_score.unwrap_or(0.0) + self.text_score.unwrap_or(0.0)
    }
}

/// Merge the vector and lexical hit streams into one ranked candidate list.
///
/// Per-entry scores: `vector_score = raw * weights.vector`;
/// `text_score = (1 - i/N) * weights.text` for the hit at position `i` of
/// `N`. A `(id, source)` pair arriving from both paths merges into a single
/// entry. Ordering: combined score descending; at equal score an entry
/// present in both paths outranks a single-path entry; remaining ties keep
/// the vector path's order (index recency), then the text rank.
pub fn fuse(
    vector_hits: &[VectorHit],
    text_hits: &[TextHit],
    weights: Weights,
    limit: usize,
) -> Vec<CandidateItem> {
    if weights.vector == 0.0 && weights.text == 0.0 {
        // zero contribution from both paths; a valid degenerate case
        return Vec::new();
    }

    let mut slots: HashMap<(ArtifactId, SourceKind), Slot> = HashMap::new();

    for (i, hit) in vector_hits.iter().enumerate() {
        let slot = slots.entry((hit.id.clone(), hit.source)).or_default();
        slot.vector_score = Some(hit.score * weights.vector);
        slot.vector_rank = Some(i);
    }

    let n = text_hits.len();
    for (i, hit) in text_hits.iter().enumerate() {
        let score = (1.0 - i as f32 / n as f32) * weights.text;
        let slot = slots.entry((hit.id.clone(), hit.source)).or_default();
        slot.text_score = Some(score);
        slot.text_rank = Some(i);
    }

    let mut ranked: Vec<((ArtifactId, SourceKind), Slot)> = slots.into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| {
        b.combined()
            .partial_cmp(&a.combined())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.corroborated().cmp(&a.corroborated()))
            .then_with(|| {
                a.vector_rank
                    .unwrap_or(usize::MAX)
                    .cmp(&b.vector_rank.unwrap_or(usize::MAX))
            })
            .then_with(|| {
                a.text_rank
                    .unwrap_or(usize::MAX)
                    .cmp(&b.text_rank.unwrap_or(usize::MAX))
            })
    });
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|((id, source), slot)| CandidateItem {
            id,
            source,
            vector_score: slot.vector_score,
            text_score: slot.text_score,
            combined_score: slot.combined(),
        })
        .collect()
}
