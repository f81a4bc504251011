//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Capability that turns text into a fixed-dimensionality vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate an embedding for the request input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::{Embedding, EmbeddingUsage};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        vectors: HashMap<String, Vec<f32>>,
        error: Option<String>,
        fail_after: Option<usize>,
        calls: AtomicUsize,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                vectors: HashMap::new(),
                error: None,
                fail_after: None,
                calls: AtomicUsize::new(0),
            }
        }

        /// Return a fixed vector for an exact input text
        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.vectors.insert(text.into(), vector);
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Succeed for the first `calls` requests, then fail
        pub fn fail_after(mut self, calls: usize) -> Self {
            self.fail_after = Some(calls);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            if self.fail_after.is_some_and(|limit| call >= limit) {
                return Err(DomainError::provider(self.name, "quota exceeded"));
            }

            let text = request.input();
            let vector = match self.vectors.get(text) {
                Some(vector) => vector.clone(),
                None => {
                    // Deterministic mock embedding based on text hash
                    let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_add(b as u64));
                    (0..self.dimensions)
                        .map(|i| ((hash.wrapping_add(i as u64) % 1000) as f32 / 1000.0) - 0.5)
                        .collect()
                }
            };

            let tokens = (text.len() / 4) as u32;

            Ok(EmbeddingResponse::new(
                request.model().to_string(),
                vec![Embedding::new(0, vector)],
                EmbeddingUsage::new(tokens, tokens),
            ))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_dimensions() {
            let provider = MockEmbeddingProvider::new("test", 128);
            let request = EmbeddingRequest::new("mock-embedding", "Hello");

            let response = provider.embed(request).await.unwrap();

            assert_eq!(response.embeddings().len(), 1);
            assert_eq!(response.embeddings()[0].dimensions(), 128);
            assert_eq!(provider.calls(), 1);
        }

        #[tokio::test]
        async fn test_mock_provider_fixed_vector() {
            let provider =
                MockEmbeddingProvider::new("test", 3).with_vector("fixed", vec![1.0, 0.0, 0.0]);

            let response = provider
                .embed(EmbeddingRequest::new("mock-embedding", "fixed"))
                .await
                .unwrap();

            assert_eq!(response.embeddings()[0].vector(), &[1.0, 0.0, 0.0]);
        }

        #[tokio::test]
        async fn test_mock_provider_fail_after() {
            let provider = MockEmbeddingProvider::new("test", 4).fail_after(1);

            assert!(provider.embed(EmbeddingRequest::new("m", "a")).await.is_ok());
            assert!(provider.embed(EmbeddingRequest::new("m", "b")).await.is_err());
            assert_eq!(provider.calls(), 2);
        }

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new("test", 16);

            let first = provider
                .embed(EmbeddingRequest::new("m", "Hello"))
                .await
                .unwrap();
            let second = provider
                .embed(EmbeddingRequest::new("m", "Hello"))
                .await
                .unwrap();

            assert_eq!(first.embeddings()[0].vector(), second.embeddings()[0].vector());
        }
    }
}
