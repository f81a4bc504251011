//! Document ingestion domain: chunking contracts

mod chunker;

pub use chunker::{helpers, Chunk, ChunkingConfig, ChunkingStrategy};
