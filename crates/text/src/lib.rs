//! # `anyprompt-text`: Plain Text Loading and Chunking
//!
//! This crate provides the plain-text plugins for the `anyprompt` retrieval helpers:
//! a [`TextLoader`] that reads a file into a single document, and a
//! [`RecursiveCharacterSplitter`] that cuts documents into overlapping chunks.

use anyprompt::rag::{Document, DocumentLoader, DocumentSplitter, RagError};
use async_trait::async_trait;
use std::{io, path::PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// The default maximum chunk size, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// The default number of characters carried over between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
/// Separators tried in order, from paragraph breaks down to single characters.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Errors raised when configuring a splitter.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextSplitError {
    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,
    #[error("Got a larger chunk overlap ({overlap}) than chunk size ({size}), should be smaller")]
    OverlapTooLarge { size: usize, overlap: usize },
}

// --- Loader ---

/// Loads a UTF-8 text file as one document with a `source` metadata entry.
#[derive(Debug, Clone)]
pub struct TextLoader {
    path: PathBuf,
}

impl TextLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentLoader for TextLoader {
    async fn load(&self) -> Result<Vec<Document>, RagError> {
        let source = self.path.display().to_string();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RagError::SourceNotFound(source.clone()),
                _ => RagError::runtime(format!("Error loading {source}"), e),
            })?;

        debug!("Loaded {} character(s) from {}", text.chars().count(), source);
        Ok(vec![Document::new(text).with_metadata("source", source)])
    }
}

// --- Splitter ---

/// Splits text by trying separators in order until every piece fits `chunk_size`,
/// then merges adjacent pieces back up to `chunk_size` with `chunk_overlap` characters
/// shared between consecutive chunks.
///
/// Separators stay attached to the start of the piece that follows them, and every
/// chunk is trimmed of surrounding whitespace. Sizes are counted in characters.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, TextSplitError> {
        if chunk_size == 0 {
            return Err(TextSplitError::ZeroChunkSize);
        }
        if chunk_overlap > chunk_size {
            return Err(TextSplitError::OverlapTooLarge {
                size: chunk_size,
                overlap: chunk_overlap,
            });
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            ..Default::default()
        })
    }

    /// Replaces the separator list. An empty string as the last separator guarantees
    /// that every chunk can be brought under the size limit.
    pub fn with_separators<S: Into<String>>(mut self, separators: Vec<S>) -> Self {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let separators: Vec<&str> = self.separators.iter().map(String::as_str).collect();
        self.split_recursive(text, &separators)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // Pick the first separator present in the text; "" always matches.
        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = *candidate;
                break;
            }
            if text.contains(*candidate) {
                separator = *candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut good_splits: Vec<String> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }
            if remaining.is_empty() {
                final_chunks.push(piece);
            } else {
                final_chunks.extend(self.split_recursive(&piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Greedily joins pieces into chunks of at most `chunk_size` characters, starting each
    /// new chunk with the trailing pieces of the previous one that fit in `chunk_overlap`.
    fn merge_splits(&self, splits: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut total = 0;
        let mut start = 0;

        for split in splits {
            let len = char_len(split);

            if total + len > self.chunk_size && current.len() > start {
                if total > self.chunk_size {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, self.chunk_size
                    );
                }
                if let Some(chunk) = join_pieces(&current[start..]) {
                    chunks.push(chunk);
                }

                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    total -= char_len(current[start]);
                    start += 1;
                }
            }

            current.push(split);
            total += len;
        }

        if let Some(chunk) = join_pieces(&current[start..]) {
            chunks.push(chunk);
        }
        chunks
    }
}

impl DocumentSplitter for RecursiveCharacterSplitter {
    fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|document| {
                self.split_text(&document.page_content)
                    .into_iter()
                    .map(move |chunk| Document {
                        page_content: chunk,
                        metadata: document.metadata.clone(),
                    })
            })
            .collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Concatenates pieces and trims the result; whitespace-only chunks are dropped.
fn join_pieces(pieces: &[&str]) -> Option<String> {
    let joined = pieces.concat();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Splits `text` on `separator`, attaching each separator to the start of the piece
/// that follows it. An empty separator splits into single characters.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut pieces = Vec::new();
    let mut last = 0;
    for (idx, _) in text.match_indices(separator) {
        pieces.push(&text[last..idx]);
        last = idx;
    }
    pieces.push(&text[last..]);

    pieces
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(
            split_keeping_separator("a\n\nb\n\nc", "\n\n"),
            vec!["a", "\n\nb", "\n\nc"]
        );
        assert_eq!(
            split_keeping_separator("\n\nI'm here", "\n"),
            vec!["\n", "\nI'm here"]
        );
        assert_eq!(split_keeping_separator("abc", ""), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_join_pieces_drops_blank_chunks() {
        assert_eq!(join_pieces(&["\n", " "]), None);
        assert_eq!(join_pieces(&["\nfoo", " bar "]), Some("foo bar".to_string()));
    }
}
