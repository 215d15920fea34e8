//! Exemplar corpus: storage, similarity ranking and loading.
//!
//! - [`CorpusIndex`]: immutable-after-build exemplar store
//! - [`CorpusHandle`]: atomically swappable snapshot holder
//! - [`ExemplarRetriever`]: ranked, deduplicated retrieval
//! - [`loader`]: JSONL records and index building
//! - [`HashingEmbedder`]: deterministic offline embedding provider

pub mod embedder;
pub mod handle;
pub mod index;
pub mod loader;
pub mod retriever;
pub mod vector;

pub use embedder::HashingEmbedder;
pub use handle::CorpusHandle;
pub use index::CorpusIndex;
pub use loader::{build_index, parse_jsonl, read_jsonl, ExemplarRecord, LoadError, LoadMode};
pub use retriever::ExemplarRetriever;
pub use vector::cosine_similarity;
