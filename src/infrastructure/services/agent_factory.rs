//! Construction of retrieval agents bound to real capabilities

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use super::rag_agent::{AgentModels, RagAgent, RagConfig};
use crate::config::OpenAiConfig;
use crate::domain::DomainError;
use crate::infrastructure::embedding::OpenAiEmbeddingProvider;
use crate::infrastructure::llm::{HttpClient, OpenAiProvider};

/// Builds a ready agent from a credential and a configuration
pub trait AgentFactory: Send + Sync + Debug {
    fn create(&self, api_key: &str, config: RagConfig) -> Result<RagAgent, DomainError>;
}

/// Binds agents to the OpenAI embedding and chat completion endpoints
#[derive(Debug, Clone, Default)]
pub struct OpenAiAgentFactory {
    settings: OpenAiConfig,
}

impl OpenAiAgentFactory {
    pub fn new(settings: OpenAiConfig) -> Self {
        Self { settings }
    }
}

impl AgentFactory for OpenAiAgentFactory {
    fn create(&self, api_key: &str, config: RagConfig) -> Result<RagAgent, DomainError> {
        if api_key.trim().is_empty() {
            return Err(DomainError::configuration("API key is required"));
        }

        let client = HttpClient::with_timeout(Duration::from_secs(self.settings.timeout_secs))?;

        let embedder = OpenAiEmbeddingProvider::with_base_url(
            client.clone(),
            api_key,
            self.settings.base_url.clone(),
        );
        let composer =
            OpenAiProvider::with_base_url(client, api_key, self.settings.base_url.clone());

        let models = AgentModels {
            embedding_model: self.settings.embedding_model.clone(),
            chat_model: self.settings.chat_model.clone(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        Ok(RagAgent::new(config, Arc::new(embedder), Arc::new(composer))?.with_models(models))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockLlmProvider;

    /// Builds agents over deterministic fake capabilities
    #[derive(Debug)]
    pub struct MockAgentFactory {
        dimensions: usize,
        answer: String,
        embedding_error: Option<String>,
    }

    impl MockAgentFactory {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                answer: "mock answer".to_string(),
                embedding_error: None,
            }
        }

        pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
            self.answer = answer.into();
            self
        }

        pub fn with_embedding_error(mut self, error: impl Into<String>) -> Self {
            self.embedding_error = Some(error.into());
            self
        }
    }

    impl AgentFactory for MockAgentFactory {
        fn create(&self, api_key: &str, config: RagConfig) -> Result<RagAgent, DomainError> {
            if api_key.trim().is_empty() {
                return Err(DomainError::configuration("API key is required"));
            }

            let mut embedder = MockEmbeddingProvider::new("mock", self.dimensions);
            if let Some(ref error) = self.embedding_error {
                embedder = embedder.with_error(error.clone());
            }
            let composer = MockLlmProvider::new("mock").with_answer(self.answer.clone());

            RagAgent::new(config, Arc::new(embedder), Arc::new(composer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        let factory = OpenAiAgentFactory::default();

        let result = factory.create("  ", RagConfig::default());

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_creates_agent_with_config() {
        let factory = OpenAiAgentFactory::new(OpenAiConfig::default());
        let config = RagConfig {
            chunk_size: 500,
            chunk_overlap: 50,
            max_retrieved_docs: 5,
        };

        let agent = factory.create("sk-test", config.clone()).unwrap();

        assert_eq!(agent.config(), &config);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let factory = OpenAiAgentFactory::default();
        let config = RagConfig {
            chunk_size: 100,
            chunk_overlap: 150,
            max_retrieved_docs: 3,
        };

        assert!(factory.create("sk-test", config).is_err());
    }
}
