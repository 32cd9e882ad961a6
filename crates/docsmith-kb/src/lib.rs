//! Semantic search over a local knowledge-base snapshot.
//!
//! The snapshot is a JSONL file of pre-embedded records tagged by source.
//! A query goes through three stages: remote embedding call, local vector
//! search, result shaping. Each stage fails with its own error variant so
//! the caller can tell a dead embedding endpoint from a bad snapshot.

pub mod index;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use docsmith_llm::EmbeddingClient;

pub use index::VectorIndex;
pub use store::{KnowledgeBase, SnapshotRecord};

/// Default number of hits returned per query.
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum KbError {
    #[error("knowledge base unavailable: {0}")]
    Unavailable(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// One ranked snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    pub text: String,
    pub source: String,
}

/// The shaped result handed to the agent as a tool payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub query: String,
    pub results_count: usize,
    /// Distinct sources across the hits, sorted.
    pub sources_found: Vec<String>,
    pub results: Vec<SearchHit>,
}

/// Embed the query remotely, search the local index, shape the hits.
pub async fn semantic_search(
    kb: &KnowledgeBase,
    embedder: &EmbeddingClient,
    query: &str,
    top_k: usize,
) -> Result<SearchOutcome, KbError> {
    debug!(query, top_k, "knowledge base search");

    let query_vector = embedder
        .embed(query)
        .await
        .map_err(|e| KbError::Embedding(e.to_string()))?;

    let hits = kb.search(&query_vector, top_k)?;

    let mut sources_found: Vec<String> = hits.iter().map(|h| h.source.clone()).collect();
    sources_found.sort();
    sources_found.dedup();

    info!(
        results = hits.len(),
        sources = sources_found.len(),
        "knowledge base search complete"
    );

    Ok(SearchOutcome {
        query: query.to_string(),
        results_count: hits.len(),
        sources_found,
        results: hits,
    })
}
