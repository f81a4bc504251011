//! Vector index trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{KnowledgeBaseStats, Metadata, ScoredEntry};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Storage and nearest-neighbour search over embedded chunks
///
/// The in-memory implementation is a brute-force scan; an approximate index can
/// be swapped in behind this trait without touching callers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Register a new ingestion call and return its document id
    async fn begin_document(&self) -> Result<String, DomainError>;

    /// Store an entry and return its fresh id
    async fn insert(
        &self,
        document_id: &str,
        text: String,
        embedding: Vec<f32>,
        metadata: Metadata,
    ) -> Result<String, DomainError>;

    /// Up to `k` entries by descending cosine similarity, earlier insertions first on ties
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredEntry>, DomainError>;

    /// Remove every entry and reset the document count
    async fn clear(&self) -> Result<(), DomainError>;

    async fn stats(&self) -> Result<KnowledgeBaseStats, DomainError>;

    /// Number of stored entries
    async fn len(&self) -> Result<usize, DomainError>;
}
