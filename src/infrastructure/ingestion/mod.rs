//! Document ingestion infrastructure

mod chunkers;

pub use chunkers::RecursiveChunker;
