//! Request pipeline — embed, retrieve, select, assemble.
//!
//! # Flow
//!
//! 1. Validate the request (numeric parameters, non-empty target)
//! 2. Take a corpus snapshot
//! 3. Embed the target skeleton under a timeout
//! 4. Retrieve ranked, deduplicated exemplars
//! 5. Select the prefix that fits the budget
//! 6. Assemble the prompt document
//!
//! Only step 3 can suspend. Everything after it is synchronous and works on
//! the snapshot, so a timeout or cancellation leaves no state behind.

use crate::assembler::PromptAssembler;
use crate::length::{document_len, LengthUnit};
use crate::selector::{BudgetedSelector, Candidate};
use fewshot_core::embedding::EmbeddingProvider;
use fewshot_core::error::{CorpusError, EmbeddingError, Result};
use fewshot_core::exemplar::{Exemplar, RetrievalResult};
use fewshot_core::message::PromptDocument;
use fewshot_core::request::PromptRequest;
use fewshot_corpus::{CorpusHandle, CorpusIndex, ExemplarRetriever};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for the embedding call.
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PromptOutcome {
    /// The assembled prompt
    pub document: PromptDocument,
    /// The full ranked list before budget trimming
    pub retrieved: Vec<RetrievalResult>,
    /// Content length of `document` in the pipeline's unit
    pub prompt_len: usize,
    /// Length of the preamble plus target block
    pub fixed_overhead_len: usize,
}

/// Wires retriever, selector and assembler together.
#[derive(Debug, Clone)]
pub struct FewShotPipeline {
    retriever: ExemplarRetriever,
    selector: BudgetedSelector,
    assembler: PromptAssembler,
    unit: LengthUnit,
    embed_timeout: Duration,
}

impl Default for FewShotPipeline {
    fn default() -> Self {
        Self::new(PromptAssembler::new())
    }
}

impl FewShotPipeline {
    pub fn new(assembler: PromptAssembler) -> Self {
        Self {
            retriever: ExemplarRetriever::new(),
            selector: BudgetedSelector::new(),
            assembler,
            unit: LengthUnit::default(),
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }

    pub fn with_length_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn length_unit(&self) -> LengthUnit {
        self.unit
    }

    /// Build a prompt, embedding the target skeleton with `embedder`.
    ///
    /// Embedding failures and timeouts are fatal; no partial retrieval is
    /// attempted.
    pub async fn build(
        &self,
        corpus: &CorpusHandle,
        embedder: &dyn EmbeddingProvider,
        request: &PromptRequest,
    ) -> Result<PromptOutcome> {
        request.validate()?;
        self.assembler.check_target(&request.target_skeleton)?;

        let index = corpus.snapshot();

        let embedding = tokio::time::timeout(self.embed_timeout, embedder.embed(&request.target_skeleton)).await;
        let vector = match embedding {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    provider = embedder.name(),
                    timeout_ms = self.embed_timeout.as_millis() as u64,
                    "Target embedding timed out"
                );
                return Err(EmbeddingError::Timeout {
                    timeout_ms: self.embed_timeout.as_millis() as u64,
                }
                .into());
            }
        };
        if vector.len() != embedder.dimension() {
            return Err(EmbeddingError::DimensionMismatch {
                provider: embedder.name().to_string(),
                expected: embedder.dimension(),
                actual: vector.len(),
            }
            .into());
        }

        self.build_with_vector(&index, &vector, request)
    }

    /// Build a prompt from an already computed target vector.
    pub fn build_with_vector(
        &self,
        index: &CorpusIndex,
        target_vector: &[f32],
        request: &PromptRequest,
    ) -> Result<PromptOutcome> {
        request.validate()?;
        self.assembler.check_target(&request.target_skeleton)?;

        let retrieved = self
            .retriever
            .retrieve(index, target_vector, &request.retrieval_params())?;

        let exemplars = retrieved
            .iter()
            .map(|r| index.get(&r.exemplar_id))
            .collect::<std::result::Result<Vec<&Exemplar>, CorpusError>>()?;

        let target = request.target_skeleton.as_str();
        let fixed_overhead_len = self.assembler.fixed_overhead_len(target, self.unit);
        let candidates = exemplars.iter().enumerate().map(|(i, exemplar)| {
            Candidate::new(*exemplar, self.assembler.example_len(i + 1, exemplar, self.unit))
        });
        let selection = self.selector.select(candidates, fixed_overhead_len, request.budget);

        let mut document = self.assembler.build_messages(target, &selection.selected)?;
        document.examples_dropped_for_budget = selection.dropped_count;
        let prompt_len = document_len(&document, self.unit);

        debug!(
            retrieved = retrieved.len(),
            selected = selection.selected.len(),
            dropped = selection.dropped_count,
            dropped_len = selection.dropped_len,
            "Exemplars selected"
        );

        if fixed_overhead_len > request.budget {
            warn!(
                fixed_overhead_len,
                budget = request.budget,
                "Target and preamble alone exceed the budget"
            );
        }
        if document.is_zero_shot() {
            let reason = if retrieved.is_empty() {
                "no exemplars retrieved"
            } else {
                "no exemplar fits the budget"
            };
            warn!(reason, dropped = selection.dropped_count, "Falling back to zero-shot prompt");
        }

        info!(
            examples = document.num_examples_used,
            dropped = document.examples_dropped_for_budget,
            prompt_len,
            budget = request.budget,
            hash = %document.content_hash(),
            "Prompt assembled"
        );

        Ok(PromptOutcome {
            document,
            retrieved,
            prompt_len,
            fixed_overhead_len,
        })
    }
}
