//! Exemplar retrieval — rank by cosine similarity, then collapse near-duplicates.
//!
//! # Algorithm
//!
//! 1. Validate parameters and the target vector's dimension
//! 2. Score every non-excluded exemplar against the target (brute force, O(n·D))
//! 3. Sort by descending score, ties broken by ascending id
//! 4. Walk in rank order, keeping a candidate only if its similarity to every
//!    already-kept candidate is ≤ `dedup_threshold`
//! 5. Stop once `k` candidates are kept
//!
//! The output is a pure function of (index, target, params): there is no
//! hidden state, so repeated calls return identical lists.

use crate::index::CorpusIndex;
use crate::vector::{check_vector, cosine_similarity};
use fewshot_core::error::{CorpusError, Result};
use fewshot_core::exemplar::{ExemplarId, RetrievalResult};
use fewshot_core::request::RetrievalParams;
use tracing::debug;

struct Scored<'a> {
    id: &'a ExemplarId,
    vector: &'a [f32],
    score: f32,
}

/// Stateless retriever. Create one and reuse it across requests and threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExemplarRetriever;

impl ExemplarRetriever {
    pub fn new() -> Self {
        Self
    }

    /// Return at most `params.k` exemplars ranked by similarity to `target_vector`.
    ///
    /// An empty corpus yields an empty list, which callers treat as a
    /// zero-shot fallback.
    pub fn retrieve(
        &self,
        index: &CorpusIndex,
        target_vector: &[f32],
        params: &RetrievalParams,
    ) -> Result<Vec<RetrievalResult>> {
        params.validate()?;

        let Some(dimension) = index.dimension() else {
            debug!("Corpus is empty, returning no exemplars");
            return Ok(Vec::new());
        };
        if target_vector.len() != dimension {
            return Err(CorpusError::DimensionMismatch {
                expected: dimension,
                actual: target_vector.len(),
            }
            .into());
        }
        check_vector(target_vector)?;

        let mut excluded = 0usize;
        let mut scored: Vec<Scored<'_>> = index
            .all()
            .filter_map(|(exemplar, vector)| {
                if params.exclude_ids.contains(&exemplar.id) {
                    excluded += 1;
                    return None;
                }
                Some(Scored {
                    id: &exemplar.id,
                    vector,
                    score: cosine_similarity(target_vector, vector),
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(b.id)));

        let mut kept: Vec<&Scored<'_>> = Vec::with_capacity(params.k.min(scored.len()));
        let mut suppressed = 0usize;
        for candidate in &scored {
            if kept.len() == params.k {
                break;
            }
            let redundant = kept
                .iter()
                .any(|k| cosine_similarity(k.vector, candidate.vector) > params.dedup_threshold);
            if redundant {
                suppressed += 1;
                continue;
            }
            kept.push(candidate);
        }

        debug!(
            scored = scored.len(),
            excluded,
            suppressed,
            returned = kept.len(),
            k = params.k,
            "Exemplars retrieved"
        );

        Ok(kept
            .into_iter()
            .enumerate()
            .map(|(rank, s)| RetrievalResult {
                exemplar_id: s.id.clone(),
                similarity_score: s.score,
                rank,
            })
            .collect())
    }
}
