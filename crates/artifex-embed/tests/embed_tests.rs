use artifex_core::traits::EmbeddingProvider;
use artifex_embed::{default_provider, HashedEmbedder, OfflineProvider};

#[tokio::test]
async fn hashed_embedder_shape_and_determinism() {
    let embedder = HashedEmbedder::new(256);
    let v1 = embedder.embed("summer sale poster").await.expect("embed");
    let v2 = embedder.embed("summer sale poster").await.expect("embed");

    assert_eq!(v1.len(), 256, "embedding dim matches construction");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[tokio::test]
async fn tokenization_is_case_insensitive() {
    let embedder = HashedEmbedder::new(128);
    let a = embedder.embed("Beach Party").await.expect("embed");
    let b = embedder.embed("beach party").await.expect("embed");
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() <= 1e-6);
    }
}

#[tokio::test]
async fn shared_tokens_score_higher_than_disjoint() {
    let embedder = HashedEmbedder::new(256);
    let q = embedder.embed("birthday card flowers").await.expect("embed");
    let near = embedder.embed("birthday card balloons").await.expect("embed");
    let far = embedder.embed("quarterly revenue spreadsheet").await.expect("embed");

    let dot = |a: &[f32], b: &[f32]| a.iter().zip(b.iter()).map(|(x, y)| x * y).sum::<f32>();
    assert!(dot(&q, &near) > dot(&q, &far));
}

#[tokio::test]
async fn empty_text_is_rejected() {
    let embedder = HashedEmbedder::new(64);
    assert!(embedder.embed("   ").await.is_err());
}

#[tokio::test]
async fn offline_provider_reports_unavailable() {
    let provider = OfflineProvider::new(64);
    let err = provider.embed("anything").await.expect_err("must fail");
    assert!(matches!(err, artifex_core::error::Error::DependencyUnavailable(_)));
}

#[test]
fn default_provider_uses_configured_dim() {
    let provider = default_provider(512);
    assert_eq!(provider.dim(), 512);
}
