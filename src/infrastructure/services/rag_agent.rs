//! Retrieval agent: ingestion, retrieval and grounded answering over one knowledge base

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::ingestion::{helpers, ChunkingConfig, ChunkingStrategy};
use crate::domain::knowledge_base::{KnowledgeBaseStats, Metadata, ScoredEntry, VectorIndex};
use crate::domain::llm::{FinishReason, LlmProvider, LlmRequest};
use crate::domain::DomainError;
use crate::infrastructure::ingestion::RecursiveChunker;
use crate::infrastructure::knowledge_base::InMemoryVectorIndex;

pub const EMPTY_KNOWLEDGE_BASE_ANSWER: &str =
    "The knowledge base is empty. Please add some documents first.";
pub const NO_RELEVANT_INFORMATION_ANSWER: &str =
    "Sorry, I could not find relevant information in the knowledge base to answer your question.";
pub const ASK_FAILURE_ANSWER: &str = "Sorry, an error occurred while processing your question.";

const SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant. Answer the user's question \
using only the provided context. If the context does not contain the answer, say so honestly.";

const SOURCE_EXCERPT_CHARS: usize = 100;

/// Chunking and retrieval parameters for one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), default)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_retrieved_docs: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            max_retrieved_docs: 3,
        }
    }
}

impl RagConfig {
    /// Build a config from optional caller options; missing or zero values take the defaults
    pub fn from_options(
        chunk_size: Option<usize>,
        chunk_overlap: Option<usize>,
        max_retrieved_docs: Option<usize>,
        defaults: &RagConfig,
    ) -> Self {
        let pick = |value: Option<usize>, default: usize| {
            value.filter(|v| *v > 0).unwrap_or(default)
        };

        Self {
            chunk_size: pick(chunk_size, defaults.chunk_size),
            chunk_overlap: pick(chunk_overlap, defaults.chunk_overlap),
            max_retrieved_docs: pick(max_retrieved_docs, defaults.max_retrieved_docs),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.chunking().validate()?;

        if self.max_retrieved_docs == 0 {
            return Err(DomainError::configuration(
                "max_retrieved_docs must be greater than 0",
            ));
        }

        Ok(())
    }

    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
    }
}

/// Models and sampling settings used by the agent's capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct AgentModels {
    pub embedding_model: String,
    pub chat_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AgentModels {
    fn default() -> Self {
        Self {
            embedding_model: "text-embedding-ada-002".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// A retrieved chunk as shown to the caller of `ask`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceExcerpt {
    #[serde(rename = "content")]
    pub excerpt: String,
    pub similarity: f32,
    pub metadata: Metadata,
}

/// Result of `ask`. Never an error: failures become a fixed answer without sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskOutcome {
    pub answer: String,
    pub sources: Option<Vec<SourceExcerpt>>,
}

impl AskOutcome {
    fn message(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: None,
        }
    }
}

/// Orchestrates chunking, embedding, storage and answer composition
#[derive(Debug)]
pub struct RagAgent {
    config: RagConfig,
    models: AgentModels,
    embedder: Arc<dyn EmbeddingProvider>,
    composer: Arc<dyn LlmProvider>,
    index: Arc<dyn VectorIndex>,
    chunker: Arc<dyn ChunkingStrategy>,
}

impl RagAgent {
    /// Create an agent with an empty in-memory knowledge base
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        composer: Arc<dyn LlmProvider>,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        Ok(Self {
            config,
            models: AgentModels::default(),
            embedder,
            composer,
            index: Arc::new(InMemoryVectorIndex::new()),
            chunker: Arc::new(RecursiveChunker::new()),
        })
    }

    pub fn with_models(mut self, models: AgentModels) -> Self {
        self.models = models;
        self
    }

    pub fn with_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = index;
        self
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Split, embed and store a document, returning the number of chunks created.
    ///
    /// Chunks stored before an embedding failure stay in the index; the error
    /// is returned to the caller.
    pub async fn add_document(
        &self,
        content: &str,
        metadata: Metadata,
    ) -> Result<usize, DomainError> {
        if content.is_empty() {
            return Err(DomainError::invalid_input("Document content is required"));
        }

        let chunks = self
            .chunker
            .chunk(content, &self.config.chunking(), &metadata)?;
        let document_id = self.index.begin_document().await?;

        debug!(
            document_id = %document_id,
            chunks = chunks.len(),
            strategy = self.chunker.name(),
            "Embedding document chunks"
        );

        let total = chunks.len();
        for chunk in chunks {
            let (text, chunk_metadata) = chunk.into_parts();
            let embedding = self.embed(&text).await?;
            self.index
                .insert(&document_id, text, embedding, chunk_metadata)
                .await?;
        }

        info!(document_id = %document_id, chunks = total, "Document added to knowledge base");
        Ok(total)
    }

    /// Read a UTF-8 file and ingest it with `source` and `filePath` metadata
    pub async fn load_document_from_file(&self, path: impl AsRef<Path>) -> Result<usize, DomainError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::internal(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), serde_json::json!(file_name));
        metadata.insert(
            "filePath".to_string(),
            serde_json::json!(path.display().to_string()),
        );

        self.add_document(&content, metadata).await
    }

    /// The `max_retrieved_docs` entries most similar to the query
    pub async fn retrieve_relevant_docs(&self, query: &str) -> Result<Vec<ScoredEntry>, DomainError> {
        if query.is_empty() {
            return Err(DomainError::invalid_input("Query is required"));
        }

        if self.index.len().await? == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embed(query).await?;
        let results = self
            .index
            .search(&query_embedding, self.config.max_retrieved_docs)
            .await?;

        debug!(query = %query, found = results.len(), "Retrieved relevant documents");
        Ok(results)
    }

    /// Answer a question from the knowledge base
    pub async fn ask(&self, question: &str) -> AskOutcome {
        match self.try_ask(question).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Failed to answer question");
                AskOutcome::message(ASK_FAILURE_ANSWER)
            }
        }
    }

    async fn try_ask(&self, question: &str) -> Result<AskOutcome, DomainError> {
        info!(question = %question, "Answering question");

        if self.index.len().await? == 0 {
            return Ok(AskOutcome::message(EMPTY_KNOWLEDGE_BASE_ANSWER));
        }

        let relevant = self.retrieve_relevant_docs(question).await?;
        if relevant.is_empty() {
            return Ok(AskOutcome::message(NO_RELEVANT_INFORMATION_ANSWER));
        }

        let request = LlmRequest::builder()
            .system(SYSTEM_INSTRUCTION)
            .user(Self::build_prompt(question, &relevant))
            .temperature(self.models.temperature)
            .max_tokens(self.models.max_tokens)
            .build();

        let response = self.composer.chat(&self.models.chat_model, request).await?;

        if response.finish_reason == Some(FinishReason::Length) {
            warn!(
                max_tokens = self.models.max_tokens,
                "Answer was cut off at the completion token limit"
            );
        }
        debug!(
            model = %response.model,
            finish_reason = ?response.finish_reason,
            total_tokens = response.usage.as_ref().map(|usage| usage.total_tokens),
            "Answer composed"
        );

        let sources = relevant
            .into_iter()
            .map(|scored| SourceExcerpt {
                excerpt: helpers::preview(scored.entry.text(), SOURCE_EXCERPT_CHARS),
                similarity: scored.similarity,
                metadata: scored.entry.metadata().clone(),
            })
            .collect();

        Ok(AskOutcome {
            answer: response.content().to_string(),
            sources: Some(sources),
        })
    }

    /// Grounding prompt listing each chunk with its rank and similarity, then the question
    pub fn build_prompt(question: &str, relevant: &[ScoredEntry]) -> String {
        let context = relevant
            .iter()
            .enumerate()
            .map(|(i, scored)| {
                format!(
                    "Document {} (similarity: {:.3}):\n{}",
                    i + 1,
                    scored.similarity,
                    scored.entry.text()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        format!(
            "Answer the question based on the following context.\n\n\
             Context:\n{}\n\n\
             Question: {}\n\n\
             Please provide an accurate and helpful answer:",
            context, question
        )
    }

    pub async fn stats(&self) -> Result<KnowledgeBaseStats, DomainError> {
        self.index.stats().await
    }

    pub async fn clear(&self) -> Result<(), DomainError> {
        self.index.clear().await?;
        info!("Knowledge base cleared");
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::new(&self.models.embedding_model, text);
        let response = self.embedder.embed(request).await?;
        debug!(
            model = %response.model(),
            tokens = response.usage().total_tokens(),
            "Text embedded"
        );

        response.into_first_vector(self.embedder.provider_name())
    }
}
