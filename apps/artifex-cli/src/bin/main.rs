use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use walkdir::WalkDir;

use artifex_core::config::{resolve_with_base, Config};
use artifex_core::store::MemoryStore;
use artifex_core::types::{ArtifactDoc, Filters, QuerySpec, SearchOutcome, SourceKind};
use artifex_embed::default_provider;
use artifex_hybrid::{Retriever, RetrieverOptions};

/// One artifact as laid out in the seed JSON files: the document plus the
/// collection it belongs to.
#[derive(Debug, Deserialize)]
struct SeedRecord {
    kind: SourceKind,
    #[serde(flatten)]
    doc: ArtifactDoc,
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <search|similar> [args...]", prog);
        eprintln!("  search  <data_dir> \"<query>\" [limit]");
        eprintln!("  similar <data_dir> <id> [limit]");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn load_records(data_dir: &Path) -> anyhow::Result<Vec<SeedRecord>> {
    let mut records = Vec::new();
    for entry in WalkDir::new(data_dir).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            let raw = std::fs::read_to_string(entry.path())?;
            let mut batch: Vec<SeedRecord> = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("{}: {}", entry.path().display(), e))?;
            records.append(&mut batch);
        }
    }
    Ok(records)
}

async fn build_retriever(
    data_dir: &Path,
    config: &Config,
) -> anyhow::Result<Retriever<MemoryStore>> {
    let retrieval = config.retrieval();
    let store = Arc::new(MemoryStore::new());
    let retriever = Retriever::new(
        Arc::clone(&store),
        default_provider(retrieval.embed_dim),
        RetrieverOptions { score_threshold: retrieval.score_threshold },
    );

    let records = load_records(data_dir)?;
    if records.is_empty() {
        anyhow::bail!("no artifact JSON files under {}", data_dir.display());
    }
    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} artifacts {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    for record in records {
        store.insert(record.kind, record.doc.clone());
        retriever.index_upsert(record.kind, &record.doc).await?;
        pb.inc(1);
    }
    pb.finish_with_message("indexed");
    Ok(retriever)
}

fn print_outcome(outcome: &SearchOutcome) {
    if outcome.degraded {
        println!("(degraded: lexical-only results)");
    }
    if outcome.results.is_empty() {
        println!("No results.");
        return;
    }
    for (i, r) in outcome.results.iter().enumerate() {
        let kind = match r.source {
            SourceKind::Template => "template",
            SourceKind::Project => "project",
        };
        println!(
            "{:>2}. [{:.3}] {:<8} {:<12} {}  (vector {:?}, text {:?})",
            i + 1,
            r.combined_score,
            kind,
            r.doc.id,
            r.doc.title,
            r.vector_score,
            r.text_score,
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();

    let data_dir = |arg: Option<&String>| -> PathBuf {
        arg.map(PathBuf::from).unwrap_or_else(|| {
            let dir: String = config
                .get("data.artifacts_dir")
                .unwrap_or_else(|_| "./seed_data".to_string());
            resolve_with_base(Path::new("."), dir)
        })
    };

    match cmd.as_str() {
        "search" => {
            let dir = data_dir(args.first());
            let query = args.get(1).cloned().unwrap_or_else(|| {
                eprintln!("Usage: artifex search <data_dir> \"<query>\" [limit]");
                std::process::exit(1)
            });
            let retriever = build_retriever(&dir, &config).await?;
            let retrieval = config.retrieval();
            let mut spec = QuerySpec::new(query);
            spec.limit = args
                .get(2)
                .and_then(|s| s.parse().ok())
                .unwrap_or(retrieval.default_limit);
            spec.weights = retrieval.weights;
            let outcome = retriever.search(&spec).await?;
            print_outcome(&outcome);
        }
        "similar" => {
            let dir = data_dir(args.first());
            let id = args.get(1).cloned().unwrap_or_else(|| {
                eprintln!("Usage: artifex similar <data_dir> <id> [limit]");
                std::process::exit(1)
            });
            let retriever = build_retriever(&dir, &config).await?;
            let limit = args
                .get(2)
                .and_then(|s| s.parse().ok())
                .unwrap_or(config.retrieval().default_limit);
            let outcome = retriever.similar(&id, limit, &Filters::default()).await?;
            print_outcome(&outcome);
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
