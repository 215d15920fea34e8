//! Deterministic feature-hashing embedder.
//!
//! A bag-of-identifiers encoding: source text is split into identifier
//! tokens, compound identifiers are split further on `snake_case` and
//! `camelCase` boundaries, and each token is hashed into one signed bucket.
//! The accumulated vector is L2-normalized.
//!
//! It needs no model weights and gives identical vectors on every platform,
//! which makes it the offline default for the CLI and for tests. Anything
//! better plugs in through [`EmbeddingProvider`].

use crate::vector::l2_normalize;
use async_trait::async_trait;
use fewshot_core::embedding::EmbeddingProvider;
use fewshot_core::error::EmbeddingError;
use sha2::{Digest, Sha256};

/// Default output dimension.
pub const DEFAULT_DIMENSION: usize = 256;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Synchronous embedding; the async trait method delegates here.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        l2_normalize(&mut v);
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_text(text))
    }
}

/// Identifier tokens of `text`, lowercased.
///
/// Each compound identifier contributes itself plus its parts, so
/// `getUserName` yields `getusername`, `get`, `user`, `name`.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
    {
        let parts = split_identifier(word);
        if parts.len() > 1 {
            tokens.push(word.to_lowercase());
        }
        tokens.extend(parts);
    }
    tokens
}

fn split_identifier(word: &str) -> Vec<String> {
    let mut parts = Vec::new();
    for piece in word.split('_').filter(|p| !p.is_empty()) {
        let chars: Vec<char> = piece.chars().collect();
        let mut start = 0;
        for i in 1..chars.len() {
            let (prev, cur) = (chars[i - 1], chars[i]);
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            // fooBar | FOOBar -> FOO, Bar
            let boundary = (cur.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (cur.is_uppercase() && prev.is_uppercase() && next_is_lower);
            if boundary {
                parts.push(chars[start..i].iter().collect::<String>().to_lowercase());
                start = i;
            }
        }
        parts.push(chars[start..].iter().collect::<String>().to_lowercase());
    }
    parts
}
