//! Domain layer - Retrieval core entities, capability traits and errors

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod knowledge_base;
pub mod llm;

pub use embedding::{cosine_similarity, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use ingestion::{Chunk, ChunkingConfig, ChunkingStrategy};
pub use knowledge_base::{IndexedEntry, KnowledgeBaseStats, Metadata, ScoredEntry, VectorIndex};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
