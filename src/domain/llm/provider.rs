use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Capability that composes an answer from a prompt
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use std::sync::Mutex;

    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        response: Option<LlmResponse>,
        error: Option<String>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                response: None,
                error: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(mut self, response: LlmResponse) -> Self {
            self.response = Some(response);
            self
        }

        /// Respond with a plain assistant message
        pub fn with_answer(self, answer: impl Into<String>) -> Self {
            let response = LlmResponse::new(
                "mock-response".to_string(),
                "mock-model".to_string(),
                Message::assistant(answer),
            );
            self.with_response(response)
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Requests received so far
        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, _model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            self.requests.lock().unwrap().push(request);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            self.response
                .clone()
                .ok_or_else(|| DomainError::provider(self.name, "No mock response configured"))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_records_requests() {
            let provider = MockLlmProvider::new("mock").with_answer("42");
            let request = LlmRequest::builder().user("question").build();

            let response = provider.chat("any", request).await.unwrap();

            assert_eq!(response.content(), "42");
            assert_eq!(provider.requests().len(), 1);
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockLlmProvider::new("mock").with_error("boom");

            let result = provider.chat("any", LlmRequest::builder().build()).await;

            assert!(result.is_err());
            assert_eq!(provider.requests().len(), 1);
        }
    }
}
