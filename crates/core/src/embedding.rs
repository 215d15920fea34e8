//! EmbeddingProvider trait — the seam to whatever turns source text into a vector.
//!
//! The core never embeds anything itself. Callers supply a provider; the
//! pipeline wraps each call in a timeout and treats any failure as fatal for
//! the request.

use async_trait::async_trait;
use crate::error::EmbeddingError;

/// Turns source text into a fixed-dimension vector.
///
/// Implementations: hashing (offline, deterministic), or any remote model
/// behind an HTTP client. Retries and rate limiting belong to the
/// implementation, not to the caller.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// A human-readable name (e.g., "hashing", "openai").
    fn name(&self) -> &str;

    /// Dimension of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of texts, in order.
    ///
    /// Default implementation calls `embed()` sequentially.
    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LengthEmbedder;

    #[async_trait]
    impl EmbeddingProvider for LengthEmbedder {
        fn name(&self) -> &str {
            "length"
        }

        fn dimension(&self) -> usize {
            1
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if text.is_empty() {
                return Err(EmbeddingError::Failed {
                    provider: self.name().into(),
                    reason: "empty input".into(),
                });
            }
            Ok(vec![text.len() as f32])
        }
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let texts = vec!["a".to_string(), "abc".to_string()];
        let out = LengthEmbedder.embed_batch(&texts).await.unwrap();
        assert_eq!(out, vec![vec![1.0], vec![3.0]]);
    }

    #[tokio::test]
    async fn batch_stops_on_first_failure() {
        let texts = vec!["a".to_string(), String::new()];
        let err = LengthEmbedder.embed_batch(&texts).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Failed { .. }));
    }
}
