//! # fewshot core
//!
//! Domain types, traits, and error definitions for few-shot exemplar
//! retrieval and prompt assembly. It depends only on serialization, hashing
//! and `async-trait`, and holds no async runtime: it defines the model that
//! the corpus and prompt crates implement against.
//!
//! The embedding model is represented only by the [`EmbeddingProvider`]
//! trait; implementations live elsewhere.

pub mod embedding;
pub mod error;
pub mod exemplar;
pub mod message;
pub mod request;

// Re-export key types at crate root for ergonomics
pub use embedding::EmbeddingProvider;
pub use error::{AssemblyError, CorpusError, EmbeddingError, Error, RequestError, Result};
pub use exemplar::{null_as_default, Exemplar, ExemplarId, ExemplarMetadata, RetrievalResult};
pub use message::{PromptDocument, PromptMessage, Role};
pub use request::{PromptRequest, RetrievalParams};
