//! Knowledge base domain: indexed entries, search results and the index trait

mod entity;
mod index;

pub use entity::{IndexedEntry, KnowledgeBaseStats, Metadata, ScoredEntry};
pub use index::VectorIndex;

#[cfg(test)]
pub use index::MockVectorIndex;
