//! Recursive character chunking strategy

use std::collections::VecDeque;

use crate::domain::ingestion::{helpers::char_len, Chunk, ChunkingConfig, ChunkingStrategy};
use crate::domain::knowledge_base::Metadata;
use crate::domain::DomainError;

/// Separators from coarsest to finest: paragraph, line, sentence, word, character
const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Chunking strategy that splits on the coarsest separator present and only
/// falls back to finer separators for pieces that are still too large.
///
/// Separators stay attached to the end of the piece they terminate, so merging
/// pieces back together reproduces the original text. Adjacent chunks share at
/// most `chunk_overlap` characters carried over from the previous chunk.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    separators: Vec<String>,
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveChunker {
    pub fn new() -> Self {
        Self::with_separators(DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_separators(separators: Vec<String>) -> Self {
        Self { separators }
    }

    fn split_text(&self, text: &str, separators: &[String], config: &ChunkingConfig) -> Vec<String> {
        let (separator, finer) = Self::pick_separator(text, separators);

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for piece in Self::split_keeping_separator(text, separator) {
            if char_len(piece) <= config.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(Self::merge_pieces(&fitting, config));
                fitting.clear();
            }

            if finer.is_empty() {
                chunks.extend(Self::split_by_size(piece, config));
            } else {
                chunks.extend(self.split_text(piece, finer, config));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(Self::merge_pieces(&fitting, config));
        }

        chunks
    }

    /// First separator present in the text (the empty separator always matches),
    /// plus the finer separators left to try
    fn pick_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
        for (i, separator) in separators.iter().enumerate() {
            if separator.is_empty() {
                return ("", &[]);
            }

            if text.contains(separator.as_str()) {
                return (separator, &separators[i + 1..]);
            }
        }

        ("", &[])
    }

    fn split_keeping_separator<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
        if separator.is_empty() {
            return text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect();
        }

        text.split_inclusive(separator).collect()
    }

    /// Greedily pack pieces into chunks, carrying a tail of at most
    /// `chunk_overlap` characters into the next chunk
    fn merge_pieces(pieces: &[&str], config: &ChunkingConfig) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut window_len = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if window_len + len > config.chunk_size && !window.is_empty() {
                Self::emit(&mut chunks, &window);

                while window_len > config.chunk_overlap
                    || (window_len + len > config.chunk_size && window_len > 0)
                {
                    match window.pop_front() {
                        Some(front) => window_len -= char_len(front),
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            window_len += len;
        }

        Self::emit(&mut chunks, &window);
        chunks
    }

    fn emit(chunks: &mut Vec<String>, window: &VecDeque<&str>) {
        let joined: String = window.iter().copied().collect();
        let trimmed = joined.trim();

        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
    }

    /// Hard split by character count, used when no finer separator is left
    fn split_by_size(text: &str, config: &ChunkingConfig) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();

        chars
            .chunks(config.chunk_size)
            .map(|c| c.iter().collect::<String>())
            .filter(|c| !c.trim().is_empty())
            .collect()
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(
        &self,
        content: &str,
        config: &ChunkingConfig,
        metadata: &Metadata,
    ) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        if content.trim().is_empty() {
            return Ok(vec![]);
        }

        let chunks = self
            .split_text(content, &self.separators, config)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(text, i, metadata.clone()))
            .collect();

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}
