//! Chunking strategy trait and types

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::knowledge_base::Metadata;
use crate::domain::DomainError;

/// Configuration for chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Maximum overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::configuration(
                "chunk_size must be greater than 0",
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(DomainError::configuration(
                "chunk_overlap must be less than chunk_size",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// A piece of a source document, carrying the document's metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    content: String,
    index: usize,
    metadata: Metadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>, index: usize, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            index,
            metadata,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Position of this chunk within its document (0-based)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        helpers::char_len(&self.content)
    }

    pub fn into_parts(self) -> (String, Metadata) {
        (self.content, self.metadata)
    }
}

/// Trait for chunking strategies
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split content into chunks, each receiving a copy of `metadata`
    fn chunk(
        &self,
        content: &str,
        config: &ChunkingConfig,
        metadata: &Metadata,
    ) -> Result<Vec<Chunk>, DomainError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

/// Helper functions for character-based text handling
pub mod helpers {
    /// Length of a string in characters (not bytes)
    pub fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    /// First `max_chars` characters, with `...` appended when anything was cut
    pub fn preview(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
            None => text.to_string(),
        }
    }
}
