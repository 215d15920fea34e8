//! Error types for the few-shot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] unifies them.
//!
//! An empty corpus or a budget nothing fits is not an error: both produce a
//! zero-shot prompt.

use crate::exemplar::ExemplarId;
use thiserror::Error;

/// The top-level error type for all few-shot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Request validation ---
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    // --- Corpus / vector contract ---
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    // --- Prompt assembly ---
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    // --- Embedding provider ---
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Invalid request parameters. Raised before any work is done.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("k must be greater than 0")]
    InvalidK,

    #[error("budget must be greater than 0")]
    InvalidBudget,

    #[error("dedup_threshold must be a finite value in [0, 1], got {0}")]
    InvalidDedupThreshold(f32),
}

/// Violations of the corpus index or vector contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorpusError {
    #[error("Duplicate exemplar id: {0}")]
    DuplicateId(ExemplarId),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Exemplar not found: {0}")]
    NotFound(ExemplarId),

    #[error("Vectors must have at least one component")]
    EmptyVector,

    #[error("Vector contains a non-finite component at index {index}")]
    NonFiniteVector { index: usize },
}

/// Errors from prompt assembly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    #[error("Target skeleton is empty; nothing to implement")]
    EmptyTargetSkeleton,
}

/// Errors from an embedding provider. Fatal for the request that triggered them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    #[error("Embedding failed ({provider}): {reason}")]
    Failed { provider: String, reason: String },

    #[error("Embedding timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Embedding provider {provider} returned {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        provider: String,
        expected: usize,
        actual: usize,
    },
}
