//! Knowledge base entities

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ingestion::helpers;

/// Free-form metadata attached to a document and copied onto each of its chunks.
/// Keys keep the order the caller supplied them in.
pub type Metadata = IndexMap<String, serde_json::Value>;

/// A stored chunk together with its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEntry {
    id: String,
    document_id: String,
    text: String,
    #[serde(skip_serializing)]
    embedding: Vec<f32>,
    metadata: Metadata,
}

impl IndexedEntry {
    /// Create an entry with a freshly generated id
    pub fn new(
        document_id: impl Into<String>,
        text: impl Into<String>,
        embedding: Vec<f32>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: Self::generate_id(),
            document_id: document_id.into(),
            text: text.into(),
            embedding,
            metadata,
        }
    }

    /// `doc_<unix millis>_<9 random hex chars>`
    pub fn generate_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("doc_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the ingestion call that produced this entry
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Text length in characters
    pub fn char_len(&self) -> usize {
        helpers::char_len(&self.text)
    }
}

/// A search hit: an entry and its cosine similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub entry: IndexedEntry,
    pub similarity: f32,
}

impl ScoredEntry {
    pub fn new(entry: IndexedEntry, similarity: f32) -> Self {
        Self { entry, similarity }
    }
}

/// Aggregate statistics over the knowledge base
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseStats {
    /// Number of ingestion calls since the last clear
    #[serde(rename = "totalDocuments")]
    pub document_count: usize,
    /// Number of stored entries
    #[serde(rename = "totalChunks")]
    pub chunk_count: usize,
    /// Rounded mean text length in characters, 0 when empty
    #[serde(rename = "avgChunkSize")]
    pub average_chunk_length: usize,
}

impl KnowledgeBaseStats {
    /// Build stats from a document count and the character lengths of all entries
    pub fn from_lengths(document_count: usize, lengths: impl IntoIterator<Item = usize>) -> Self {
        let (chunk_count, total) = lengths
            .into_iter()
            .fold((0usize, 0usize), |(count, sum), len| (count + 1, sum + len));

        let average_chunk_length = if chunk_count == 0 {
            0
        } else {
            (total as f64 / chunk_count as f64).round() as usize
        };

        Self {
            document_count,
            chunk_count,
            average_chunk_length,
        }
    }
}
