use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::index::VectorIndex;
use crate::{KbError, SearchHit};

/// One pre-embedded knowledge-base record from the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: u64,
    pub text: String,
    /// Data origin, e.g. `user_income`, `dge`, `genie`, `pills`.
    pub source: String,
    pub vector: Vec<f32>,
}

/// The loaded knowledge base: records by id plus the vector index over them.
#[derive(Debug)]
pub struct KnowledgeBase {
    records: HashMap<u64, SnapshotRecord>,
    index: VectorIndex,
}

impl KnowledgeBase {
    /// Load a JSONL snapshot. The first record fixes the vector dimension;
    /// any record disagreeing with it is a snapshot error.
    pub fn load(path: &Path) -> Result<Self, KbError> {
        if !path.exists() {
            return Err(KbError::Unavailable(format!(
                "snapshot not found at {}",
                path.display()
            )));
        }

        let file = File::open(path)
            .map_err(|e| KbError::Snapshot(format!("open {}: {e}", path.display())))?;
        let reader = BufReader::new(file);

        let mut records = HashMap::new();
        let mut index: Option<VectorIndex> = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| KbError::Snapshot(format!("read line: {e}")))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: SnapshotRecord = serde_json::from_str(&line)
                .map_err(|e| KbError::Snapshot(format!("line {}: {e}", line_no + 1)))?;

            let index = index.get_or_insert_with(|| VectorIndex::new(record.vector.len()));
            index.add(record.id, &record.vector)?;
            records.insert(record.id, record);
        }

        let index = index.ok_or_else(|| {
            KbError::Snapshot(format!("snapshot {} is empty", path.display()))
        })?;

        info!(
            records = records.len(),
            dimension = index.dimension(),
            "knowledge base loaded"
        );

        Ok(Self { records, index })
    }

    /// Try to load, mapping any failure to "unavailable" semantics the
    /// pipeline can log and skip.
    pub fn load_if_available(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(kb) => Some(kb),
            Err(e) => {
                tracing::warn!("knowledge base unavailable: {e}");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    /// Nearest records to the query vector, shaped as hits.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, KbError> {
        let scored = self.index.search(query, top_k)?;
        Ok(scored
            .into_iter()
            .filter_map(|(id, score)| {
                self.records.get(&id).map(|record| SearchHit {
                    score,
                    text: record.text.clone(),
                    source: record.source.clone(),
                })
            })
            .collect())
    }
}
