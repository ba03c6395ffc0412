use crate::{
    constants::DEFAULT_RETRIEVER_K,
    rag::{Document, RagError, VectorStore},
};
use tracing::debug;

/// Returns the `k` chunks of a [`VectorStore`] most similar to a query.
#[derive(Debug, Clone)]
pub struct Retriever {
    store: VectorStore,
    k: usize,
}

impl Retriever {
    pub fn new(store: VectorStore, k: usize) -> Self {
        Self { store, k }
    }

    pub fn with_default_k(store: VectorStore) -> Self {
        Self::new(store, DEFAULT_RETRIEVER_K)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, RagError> {
        let results = self.store.similarity_search(query, self.k).await?;
        debug!("Retrieved {} document(s) for query.", results.len());
        Ok(results.into_iter().map(|scored| scored.document).collect())
    }
}
