//! Content length measurement.
//!
//! The budget is expressed in one of two units:
//!
//! - **chars** (default): Unicode scalar values. Exact and additive, so the
//!   length of a concatenation is the sum of the lengths of its parts.
//! - **tokens**: the ~4 bytes per token heuristic, rounded up per part. The
//!   sum over parts is never smaller than the length of the whole, so
//!   budgeting by parts stays safe.

use fewshot_core::message::PromptDocument;
use serde::{Deserialize, Serialize};

/// Unit in which prompt budgets are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Chars,
    Tokens,
}

impl LengthUnit {
    pub fn measure(&self, text: &str) -> usize {
        match self {
            Self::Chars => count_chars(text),
            Self::Tokens => estimate_tokens(text),
        }
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chars" => Ok(Self::Chars),
            "tokens" => Ok(Self::Tokens),
            other => Err(format!("unknown length unit '{other}' (expected 'chars' or 'tokens')")),
        }
    }
}

pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 bytes. Rounds up.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Total content length of every message in a document.
pub fn document_len(document: &PromptDocument, unit: LengthUnit) -> usize {
    document
        .messages
        .iter()
        .map(|m| unit.measure(&m.content))
        .sum()
}
