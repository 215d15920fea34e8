//! # fewshot prompt
//!
//! Turns a ranked exemplar list into a budget-bounded, deterministic few-shot
//! prompt: length measurement, rank-monotone selection, message assembly, and
//! the [`FewShotPipeline`] that runs them end to end.

pub mod assembler;
pub mod length;
pub mod pipeline;
pub mod selector;

pub use assembler::{PromptAssembler, DEFAULT_INSTRUCTION, DEFAULT_PREAMBLE};
pub use length::{document_len, LengthUnit};
pub use pipeline::{FewShotPipeline, PromptOutcome, DEFAULT_EMBED_TIMEOUT};
pub use selector::{BudgetedSelector, Candidate, Selection};
