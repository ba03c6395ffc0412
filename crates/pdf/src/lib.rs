//! # `anyprompt-pdf`: PDF Text Extraction
//!
//! This crate extracts the text of PDF documents for the `anyprompt` tools. It offers
//! [`read_pdf`], which returns the whole document as one numbered string for prompting,
//! and [`PdfLoader`], which yields one document per page for retrieval.

use anyprompt::rag::{Document, DocumentLoader, RagError};
use async_trait::async_trait;
use pdf::file::FileOptions;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Custom error types for PDF reading and parsing.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to read PDF file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse PDF: {0}")]
    Parse(String),
    #[error("PDF parsing task failed: {0}")]
    Task(String),
}

/// Extracts the text of every page, in page order.
///
/// Parsing is CPU bound; async callers should use [`extract_pages_blocking`].
pub fn extract_pages(pdf_data: &[u8]) -> Result<Vec<String>, PdfError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| PdfError::Parse(e.to_string()))?;
    let resolver = file.resolver();
    let mut pages = Vec::with_capacity(file.num_pages() as usize);

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| PdfError::Parse(e.to_string()))?;
        let mut page_text = String::new();

        if let Some(content) = &page.contents {
            let operations = content
                .operations(&resolver)
                .map_err(|e| PdfError::Parse(e.to_string()))?;
            for op in operations.iter() {
                match op {
                    pdf::content::Op::TextDraw { text } => {
                        page_text.push_str(&text.to_string_lossy());
                    }
                    pdf::content::Op::TextDrawAdjusted { array } => {
                        for item in array.iter() {
                            if let pdf::content::TextDrawAdjusted::Text(text) = item {
                                page_text.push_str(&text.to_string_lossy());
                            }
                        }
                    }
                    pdf::content::Op::TextNewline => page_text.push('\n'),
                    _ => {}
                }
            }
        } else {
            warn!("Page {} has no content stream.", page_num);
        }
        pages.push(page_text);
    }

    Ok(pages)
}

/// Runs [`extract_pages`] on the blocking thread pool.
pub async fn extract_pages_blocking(pdf_data: Vec<u8>) -> Result<Vec<String>, PdfError> {
    tokio::task::spawn_blocking(move || extract_pages(&pdf_data))
        .await
        .map_err(|e| PdfError::Task(e.to_string()))?
}

/// Joins page texts, following each page with `"\nPage Number: {n}"` (1-based).
pub fn format_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}\nPage Number: {}", text.as_ref(), i + 1))
        .collect()
}

/// Reads a PDF file and returns its text with page number markers.
#[instrument]
pub async fn read_pdf(path: &Path) -> Result<String, PdfError> {
    let data = tokio::fs::read(path).await?;
    let pages = extract_pages_blocking(data).await?;
    info!("Extracted {} page(s) from PDF.", pages.len());
    Ok(format_pages(&pages))
}

/// Loads a PDF as one document per page, with `source` and 0-based `page` metadata.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    path: PathBuf,
}

impl PdfLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self) -> Result<Vec<Document>, RagError> {
        let source = self.path.display().to_string();
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RagError::SourceNotFound(source.clone()),
                _ => RagError::runtime(format!("Error loading {source}"), e),
            })?;

        let pages = extract_pages_blocking(data)
            .await
            .map_err(|e| RagError::runtime(format!("Error loading {source}"), e))?;

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(page, text)| {
                Document::new(text)
                    .with_metadata("source", source.clone())
                    .with_metadata("page", page.to_string())
            })
            .collect())
    }
}
