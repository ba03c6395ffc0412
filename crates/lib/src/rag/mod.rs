//! # Retrieval-Augmented Generation Helpers
//!
//! Thin sequencing over a document source, a splitter and a vector store:
//! load a document, split it into overlapping chunks, index the chunks, then
//! retrieve the chunks nearest to a query.
//!
//! Loaders and splitters are plugins (`anyprompt-text`, `anyprompt-pdf`) implementing
//! the traits defined here.

pub mod retriever;
pub mod store;

pub use retriever::Retriever;
pub use store::{ScoredDocument, VectorIndex, VectorStore};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

/// A generic error type for loaders, splitters and the vector store.
///
/// Plugins map their own failures into `Runtime`, keeping the original error as
/// the source.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("The specified source could not be found: {0}")]
    SourceNotFound(String),

    #[error("{context}: {source}")]
    Runtime {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RagError {
    pub fn runtime(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        RagError::Runtime {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// A unit of text plus free-form metadata; both whole documents and chunks use it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A source of documents, such as a text file or a PDF.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Document>, RagError>;
}

/// Splits documents into smaller chunks, copying each document's metadata onto its chunks.
pub trait DocumentSplitter: Send + Sync {
    fn split_documents(&self, documents: &[Document]) -> Vec<Document>;
}

/// Loads, splits and indexes a document, returning the populated store.
pub async fn build_vector_store(
    loader: &dyn DocumentLoader,
    splitter: &dyn DocumentSplitter,
    index: &VectorIndex,
    persist: bool,
) -> Result<VectorStore, RagError> {
    let documents = loader.load().await?;
    let chunks = splitter.split_documents(&documents);
    info!(
        "Split {} document(s) into {} chunk(s).",
        documents.len(),
        chunks.len()
    );
    index.initiate(&chunks, persist).await
}
