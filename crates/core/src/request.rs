//! Prompt and retrieval request types.

use crate::error::RequestError;
use crate::exemplar::ExemplarId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Parameters for a single retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalParams {
    /// Maximum number of results
    pub k: usize,

    /// Pairwise similarity above which the lower-ranked exemplar is dropped
    pub dedup_threshold: f32,

    /// Exemplars that must never be returned (e.g. the target itself)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_ids: BTreeSet<ExemplarId>,
}

impl RetrievalParams {
    pub fn new(k: usize, dedup_threshold: f32) -> Self {
        Self {
            k,
            dedup_threshold,
            exclude_ids: BTreeSet::new(),
        }
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = ExemplarId>) -> Self {
        self.exclude_ids.extend(ids);
        self
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        validate_k(self.k)?;
        validate_dedup_threshold(self.dedup_threshold)
    }
}

/// Everything needed to build one few-shot prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Skeleton the model should implement
    pub target_skeleton: String,

    /// Maximum number of exemplars
    pub k: usize,

    /// Maximum combined content length of the assembled prompt
    pub budget: usize,

    /// Pairwise similarity above which near-duplicate exemplars collapse
    pub dedup_threshold: f32,

    /// Exemplars that must never be used
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_ids: BTreeSet<ExemplarId>,
}

impl PromptRequest {
    pub fn new(target_skeleton: impl Into<String>, k: usize, budget: usize, dedup_threshold: f32) -> Self {
        Self {
            target_skeleton: target_skeleton.into(),
            k,
            budget,
            dedup_threshold,
            exclude_ids: BTreeSet::new(),
        }
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = ExemplarId>) -> Self {
        self.exclude_ids.extend(ids);
        self
    }

    /// Check numeric parameters. The skeleton is checked by the assembler.
    pub fn validate(&self) -> Result<(), RequestError> {
        validate_k(self.k)?;
        if self.budget == 0 {
            return Err(RequestError::InvalidBudget);
        }
        validate_dedup_threshold(self.dedup_threshold)
    }

    pub fn retrieval_params(&self) -> RetrievalParams {
        RetrievalParams {
            k: self.k,
            dedup_threshold: self.dedup_threshold,
            exclude_ids: self.exclude_ids.clone(),
        }
    }
}

fn validate_k(k: usize) -> Result<(), RequestError> {
    if k == 0 {
        return Err(RequestError::InvalidK);
    }
    Ok(())
}

fn validate_dedup_threshold(threshold: f32) -> Result<(), RequestError> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(RequestError::InvalidDedupThreshold(threshold));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_request_passes() {
        let req = PromptRequest::new("class A: pass", 2, 10_000, 0.95);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn zero_k_rejected() {
        let req = PromptRequest::new("class A: pass", 0, 10_000, 0.95);
        assert_eq!(req.validate(), Err(RequestError::InvalidK));
    }

    #[test]
    fn zero_budget_rejected() {
        let req = PromptRequest::new("class A: pass", 2, 0, 0.95);
        assert_eq!(req.validate(), Err(RequestError::InvalidBudget));
    }

    #[test]
    fn threshold_bounds_enforced() {
        for bad in [-0.1, 1.01, f32::NAN, f32::INFINITY] {
            let params = RetrievalParams::new(3, bad);
            assert!(params.validate().is_err(), "{bad} should be rejected");
        }
        for ok in [0.0, 0.5, 1.0] {
            assert!(RetrievalParams::new(3, ok).validate().is_ok());
        }
    }

    #[test]
    fn retrieval_params_carry_exclusions() {
        let req = PromptRequest::new("class A: pass", 2, 100, 0.9).excluding([ExemplarId::from("self")]);
        let params = req.retrieval_params();
        assert!(params.exclude_ids.contains(&ExemplarId::from("self")));
        assert_eq!(params.k, 2);
    }
}
