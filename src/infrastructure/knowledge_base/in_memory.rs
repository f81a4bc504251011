//! In-memory vector index with brute-force cosine search

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::embedding::cosine_similarity;
use crate::domain::knowledge_base::{
    IndexedEntry, KnowledgeBaseStats, Metadata, ScoredEntry, VectorIndex,
};
use crate::domain::DomainError;

/// In-memory vector index using linear search
///
/// Entries live in a single insertion-ordered map, which serves both id lookup
/// and ordered iteration. Embedding dimensionality is checked lazily: a stored
/// vector whose length differs from the query fails the search with
/// `DimensionMismatch`.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    state: RwLock<IndexState>,
}

#[derive(Debug, Default)]
struct IndexState {
    entries: IndexMap<String, IndexedEntry>,
    document_count: usize,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored entry by id
    pub async fn get(&self, id: &str) -> Option<IndexedEntry> {
        self.state.read().await.entries.get(id).cloned()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn begin_document(&self) -> Result<String, DomainError> {
        let mut state = self.state.write().await;
        state.document_count += 1;

        Ok(Uuid::new_v4().to_string())
    }

    async fn insert(
        &self,
        document_id: &str,
        text: String,
        embedding: Vec<f32>,
        metadata: Metadata,
    ) -> Result<String, DomainError> {
        let mut state = self.state.write().await;

        let mut entry = IndexedEntry::new(document_id, text, embedding.clone(), metadata.clone());
        while state.entries.contains_key(entry.id()) {
            entry = IndexedEntry::new(document_id, entry.text(), embedding.clone(), metadata.clone());
        }

        let id = entry.id().to_string();
        state.entries.insert(id.clone(), entry);

        Ok(id)
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredEntry>, DomainError> {
        let state = self.state.read().await;

        if k == 0 || state.entries.is_empty() {
            return Ok(vec![]);
        }

        let mut results = state
            .entries
            .values()
            .map(|entry| {
                cosine_similarity(query, entry.embedding())
                    .map(|similarity| ScoredEntry::new(entry.clone(), similarity))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps insertion order among equal scores
        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(k);

        Ok(results)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.document_count = 0;

        Ok(())
    }

    async fn stats(&self) -> Result<KnowledgeBaseStats, DomainError> {
        let state = self.state.read().await;

        Ok(KnowledgeBaseStats::from_lengths(
            state.document_count,
            state.entries.values().map(IndexedEntry::char_len),
        ))
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.state.read().await.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert(index: &InMemoryVectorIndex, text: &str, embedding: Vec<f32>) -> String {
        index
            .insert("doc", text.to_string(), embedding, Metadata::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let index = InMemoryVectorIndex::new();
        let mut metadata = Metadata::new();
        metadata.insert("tool".into(), serde_json::json!("Docker"));

        let id = index
            .insert("doc-1", "Docker packages apps".into(), vec![1.0, 0.0], metadata)
            .await
            .unwrap();

        let entry = index.get(&id).await.unwrap();
        assert_eq!(entry.text(), "Docker packages apps");
        assert_eq!(entry.document_id(), "doc-1");
        assert_eq!(entry.metadata()["tool"], "Docker");
        assert_eq!(index.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let index = InMemoryVectorIndex::new();
        insert(&index, "far", vec![0.0, 1.0]).await;
        insert(&index, "close", vec![1.0, 0.1]).await;
        insert(&index, "opposite", vec![-1.0, 0.0]).await;

        let results = index.search(&[1.0, 0.0], 3).await.unwrap();

        let texts: Vec<&str> = results.iter().map(|r| r.entry.text()).collect();
        assert_eq!(texts, vec!["close", "far", "opposite"]);
        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[tokio::test]
    async fn test_search_ties_keep_insertion_order() {
        let index = InMemoryVectorIndex::new();
        let query = vec![0.2, 0.4, 0.6];
        let a = insert(&index, "A", query.clone()).await;
        let b = insert(&index, "B", query.clone()).await;

        let results = index.search(&query, 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entry.id(), a);
        assert_eq!(results[1].entry.id(), b);
        assert_eq!(results[0].similarity, results[1].similarity);
    }

    #[tokio::test]
    async fn test_search_returns_at_most_k() {
        let index = InMemoryVectorIndex::new();
        for i in 0..5 {
            insert(&index, &format!("entry {}", i), vec![1.0, i as f32]).await;
        }

        assert_eq!(index.search(&[1.0, 0.0], 3).await.unwrap().len(), 3);
        assert_eq!(index.search(&[1.0, 0.0], 10).await.unwrap().len(), 5);
        assert!(index.search(&[1.0, 0.0], 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_dimension_mismatch() {
        let index = InMemoryVectorIndex::new();
        insert(&index, "three dims", vec![1.0, 0.0, 0.0]).await;

        let result = index.search(&[1.0, 0.0], 1).await;

        assert!(matches!(
            result,
            Err(DomainError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_search_non_finite_embeddings_fail() {
        let index = InMemoryVectorIndex::new();
        for i in 0..40 {
            let embedding = if i % 3 == 0 {
                vec![f32::NAN, 1.0]
            } else {
                vec![1.0, i as f32]
            };
            insert(&index, &format!("entry {}", i), embedding).await;
        }

        let result = index.search(&[1.0, 0.5], 40).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_search_overflowing_embedding_fails() {
        let index = InMemoryVectorIndex::new();
        insert(&index, "fine", vec![1.0, 0.0]).await;
        insert(&index, "huge", vec![1e30, 1e30]).await;

        let result = index.search(&[1e30, 1e30], 2).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_clear() {
        let index = InMemoryVectorIndex::new();
        index.begin_document().await.unwrap();
        insert(&index, "something", vec![1.0]).await;

        index.clear().await.unwrap();

        let stats = index.stats().await.unwrap();
        assert_eq!(stats.chunk_count, 0);
        assert_eq!(stats.document_count, 0);
        assert!(index.search(&[1.0], 5).await.unwrap().is_empty());

        index.clear().await.unwrap();
        assert_eq!(index.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let index = InMemoryVectorIndex::new();
        index.begin_document().await.unwrap();
        insert(&index, "abcd", vec![1.0]).await;
        insert(&index, "abcdefg", vec![1.0]).await;
        index.begin_document().await.unwrap();

        let stats = index.stats().await.unwrap();

        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.chunk_count, 2);
        assert_eq!(stats.average_chunk_length, 6);
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let index = InMemoryVectorIndex::new();

        assert_eq!(index.stats().await.unwrap(), KnowledgeBaseStats::default());
    }
}
