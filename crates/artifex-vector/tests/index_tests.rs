use artifex_core::types::{Filters, IndexMeta, SourceKind};
use artifex_vector::VectorIndex;

fn meta(category: &str) -> IndexMeta {
    IndexMeta { category: category.into(), aspect_ratio: "1:1".into(), artifact_type: "poster".into() }
}

fn no_filters() -> Filters {
    Filters::default()
}

#[test]
fn upsert_is_idempotent() {
    let index = VectorIndex::new(4);
    index.upsert("a", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    index.upsert("a", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    assert_eq!(index.len(), 1, "repeated upsert overwrites, never duplicates");

    let hits = index.query(&[1.0, 0.0, 0.0, 0.0], &no_filters(), 10, 0.0, None).expect("query");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "a");
}

#[test]
fn upsert_replaces_vector_and_meta() {
    let index = VectorIndex::new(4);
    index.upsert("a", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    index.upsert("a", SourceKind::Project, vec![0.0, 1.0, 0.0, 0.0], meta("print")).expect("upsert");

    let hits = index.query(&[0.0, 1.0, 0.0, 0.0], &no_filters(), 10, 0.5, None).expect("query");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source, SourceKind::Project);
    assert!((hits[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn remove_missing_id_is_a_noop() {
    let index = VectorIndex::new(4);
    index.upsert("a", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    index.remove("not-there");
    assert_eq!(index.len(), 1);
    index.remove("a");
    index.remove("a");
    assert!(index.is_empty());
}

#[test]
fn score_threshold_excludes_weak_matches() {
    let index = VectorIndex::new(4);
    index.upsert("near", SourceKind::Template, vec![1.0, 0.1, 0.0, 0.0], meta("social")).expect("upsert");
    index.upsert("ortho", SourceKind::Template, vec![0.0, 0.0, 1.0, 0.0], meta("social")).expect("upsert");

    let hits = index.query(&[1.0, 0.0, 0.0, 0.0], &no_filters(), 10, 0.5, None).expect("query");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "near");
}

#[test]
fn metadata_filter_restricts_results() {
    let index = VectorIndex::new(4);
    index.upsert("s", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    index.upsert("p", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("print")).expect("upsert");

    let filters = Filters { category: Some("print".into()), ..Filters::default() };
    let hits = index.query(&[1.0, 0.0, 0.0, 0.0], &filters, 10, 0.0, None).expect("query");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "p");
}

#[test]
fn equal_scores_break_toward_recency() {
    let index = VectorIndex::new(4);
    index.upsert("old", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    index.upsert("new", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");

    let hits = index.query(&[1.0, 0.0, 0.0, 0.0], &no_filters(), 10, 0.0, None).expect("query");
    assert_eq!(hits[0].id, "new", "newest entry wins the tie");
    assert_eq!(hits[1].id, "old");

    // re-upserting refreshes recency
    index.upsert("old", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    let hits = index.query(&[1.0, 0.0, 0.0, 0.0], &no_filters(), 10, 0.0, None).expect("query");
    assert_eq!(hits[0].id, "old");
}

#[test]
fn query_is_deterministic_for_fixed_state() {
    let index = VectorIndex::new(4);
    for (i, id) in ["a", "b", "c", "d"].iter().enumerate() {
        let mut v = vec![0.2; 4];
        v[i] = 1.0;
        index.upsert(id, SourceKind::Template, v, meta("social")).expect("upsert");
    }
    let q = [0.5, 0.5, 0.1, 0.0];
    let first = index.query(&q, &no_filters(), 10, 0.0, None).expect("query");
    let second = index.query(&q, &no_filters(), 10, 0.0, None).expect("query");
    let ids = |hits: &[artifex_core::types::VectorHit]| hits.iter().map(|h| h.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn exclude_drops_the_source_item() {
    let index = VectorIndex::new(4);
    index.upsert("self", SourceKind::Template, vec![1.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    index.upsert("other", SourceKind::Template, vec![0.9, 0.1, 0.0, 0.0], meta("social")).expect("upsert");

    let hits = index.query(&[1.0, 0.0, 0.0, 0.0], &no_filters(), 10, 0.0, Some("self")).expect("query");
    assert!(hits.iter().all(|h| h.id != "self"));
    assert_eq!(hits.len(), 1);
}

#[test]
fn dimension_mismatch_is_rejected() {
    let index = VectorIndex::new(4);
    assert!(index.upsert("a", SourceKind::Template, vec![1.0, 0.0], meta("social")).is_err());
    assert!(index.query(&[1.0, 0.0], &no_filters(), 10, 0.0, None).is_err());
}

#[test]
fn scores_are_normalized_to_unit_range() {
    let index = VectorIndex::new(4);
    // magnitudes differ; stored vectors are normalized so cosine caps at 1
    index.upsert("big", SourceKind::Template, vec![100.0, 0.0, 0.0, 0.0], meta("social")).expect("upsert");
    let hits = index.query(&[3.0, 0.0, 0.0, 0.0], &no_filters(), 10, 0.0, None).expect("query");
    assert!((hits[0].score - 1.0).abs() < 1e-6);
    assert!(hits[0].score <= 1.0);
}
