//! Corpus loading from JSON Lines.
//!
//! Each non-blank line is one exemplar record:
//!
//! ```json
//! {"id": "calc", "class_name": "Calculator", "skeleton": "...", "implementation": "...",
//!  "metadata": {"language": "python"}, "vector": [0.1, 0.2]}
//! ```
//!
//! `metadata` and `vector` are optional. Records without a vector are embedded
//! from their skeleton when the index is built.

use crate::index::CorpusIndex;
use fewshot_core::embedding::EmbeddingProvider;
use fewshot_core::error::{CorpusError, EmbeddingError};
use fewshot_core::exemplar::{null_as_default, Exemplar, ExemplarId, ExemplarMetadata};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One line of a corpus file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExemplarRecord {
    pub id: ExemplarId,
    pub class_name: String,
    pub skeleton: String,
    pub implementation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ExemplarMetadata,
    /// Precomputed embedding; when absent the skeleton is embedded at build time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

impl ExemplarRecord {
    fn into_parts(self) -> (Exemplar, Option<Vec<f32>>) {
        let exemplar = Exemplar {
            id: self.id,
            class_name: self.class_name,
            skeleton: self.skeleton,
            implementation: self.implementation,
            metadata: self.metadata,
        };
        (exemplar, self.vector)
    }
}

/// How to treat malformed lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Fail on the first malformed line
    #[default]
    Strict,
    /// Log and skip malformed lines
    Lenient,
}

/// Errors from loading or building a corpus.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read corpus file at {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Malformed corpus record on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Parse JSONL text into records. Blank lines are ignored.
pub fn parse_jsonl(content: &str, mode: LoadMode) -> Result<Vec<ExemplarRecord>, LoadError> {
    let mut records = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ExemplarRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => match mode {
                LoadMode::Strict => {
                    return Err(LoadError::Parse {
                        line: i + 1,
                        reason: e.to_string(),
                    });
                }
                LoadMode::Lenient => {
                    warn!(line = i + 1, error = %e, "Skipping malformed corpus record");
                }
            },
        }
    }
    Ok(records)
}

/// Read and parse a JSONL corpus file.
pub fn read_jsonl(path: &Path, mode: LoadMode) -> Result<Vec<ExemplarRecord>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let records = parse_jsonl(&content, mode)?;
    debug!(path = %path.display(), count = records.len(), "Corpus records parsed");
    Ok(records)
}

/// Build an index from records, embedding skeletons that carry no vector.
///
/// Any contract violation (duplicate id, dimension mismatch) or embedding
/// failure aborts the build; a half-built index is never returned.
pub async fn build_index(
    records: Vec<ExemplarRecord>,
    embedder: &dyn EmbeddingProvider,
) -> Result<CorpusIndex, LoadError> {
    let mut index = CorpusIndex::new();
    let mut embedded = 0usize;

    for record in records {
        let (exemplar, vector) = record.into_parts();
        let vector = match vector {
            Some(v) => v,
            None => {
                embedded += 1;
                embedder.embed(&exemplar.skeleton).await?
            }
        };
        index.add(exemplar, vector)?;
    }

    info!(
        exemplars = index.len(),
        embedded,
        provider = embedder.name(),
        dimension = index.dimension().unwrap_or(0),
        "Corpus index built"
    );
    Ok(index)
}
