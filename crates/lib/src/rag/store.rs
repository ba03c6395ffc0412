//! # Vector Store
//!
//! Chunks and their embeddings live in a Turso (SQLite-compatible) database, either
//! in memory or in a file under a persist directory. Similarity is the cosine distance
//! computed by Turso's `vector_distance_cos`.

use crate::{
    constants::VECTOR_STORE_FILE_NAME,
    providers::ai::EmbeddingProvider,
    rag::{Document, RagError, Retriever},
};
use anyhow::anyhow;
use std::{
    collections::BTreeMap,
    fmt::{self, Debug},
    path::{Path, PathBuf},
};
use tracing::{info, instrument};
use turso::{params, Builder, Database, Value as TursoValue};
use uuid::Uuid;

const IN_MEMORY_LOCATION: &str = ":memory:";

const CREATE_CHUNKS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    metadata TEXT NOT NULL,
    model_name TEXT NOT NULL,
    embedding BLOB NOT NULL
)";

/// A chunk returned by a similarity search, with its cosine distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub distance: f64,
}

/// Encodes a vector as the little-endian `f32` blob Turso's vector functions read.
fn vector_to_bytes(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// An opened vector store.
///
/// Cloning shares the same underlying database.
#[derive(Clone)]
pub struct VectorStore {
    db: Database,
    embedder: Box<dyn EmbeddingProvider>,
    location: String,
}

impl Debug for VectorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorStore")
            .field("location", &self.location)
            .field("embedder", &self.embedder)
            .finish_non_exhaustive()
    }
}

impl VectorStore {
    /// Opens (or creates) the store at `location` and ensures its table exists.
    ///
    /// `":memory:"` opens a new, isolated in-memory store.
    pub async fn open(
        location: &str,
        embedder: Box<dyn EmbeddingProvider>,
    ) -> Result<Self, RagError> {
        let db = Builder::new_local(location)
            .build()
            .await
            .map_err(|e| RagError::runtime(format!("Failed to open vector store at '{location}'"), e))?;

        let conn = db
            .connect()
            .map_err(|e| RagError::runtime("Failed to connect to vector store", e))?;
        conn.execute(CREATE_CHUNKS_TABLE_SQL, ())
            .await
            .map_err(|e| RagError::runtime("Failed to create chunks table", e))?;

        Ok(Self {
            db,
            embedder,
            location: location.to_string(),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_persistent(&self) -> bool {
        self.location != IN_MEMORY_LOCATION
    }

    /// Embeds and stores the given chunks in a single transaction.
    #[instrument(skip(self, documents), fields(location = %self.location, count = documents.len()))]
    pub async fn add_documents(&self, documents: &[Document]) -> Result<usize, RagError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let mut embedded = Vec::with_capacity(documents.len());
        for document in documents {
            let vector = self
                .embedder
                .embed(&document.page_content)
                .await
                .map_err(|e| RagError::runtime("Failed to embed chunk", e))?;
            embedded.push((document, vector));
        }

        let mut conn = self
            .db
            .connect()
            .map_err(|e| RagError::runtime("Failed to connect to vector store", e))?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| RagError::runtime("Failed to start transaction", e))?;

        for (document, vector) in embedded {
            let id = Uuid::new_v4().to_string();
            let metadata = serde_json::to_string(&document.metadata)
                .map_err(|e| RagError::runtime("Failed to serialize chunk metadata", e))?;
            let vector_bytes = vector_to_bytes(&vector);

            tx.execute(
                "INSERT INTO chunks (id, content, metadata, model_name, embedding) VALUES (?, ?, ?, ?, ?)",
                params![
                    id,
                    document.page_content.clone(),
                    metadata,
                    self.embedder.model_name(),
                    vector_bytes.as_slice()
                ],
            )
            .await
            .map_err(|e| RagError::runtime("Failed to insert chunk", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RagError::runtime("Failed to commit chunks", e))?;

        info!("Indexed {} chunk(s).", documents.len());
        Ok(documents.len())
    }

    /// The number of stored chunks.
    pub async fn count(&self) -> Result<usize, RagError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| RagError::runtime("Failed to connect to vector store", e))?;
        let mut rows = conn
            .query("SELECT COUNT(*) FROM chunks", ())
            .await
            .map_err(|e| RagError::runtime("Failed to count chunks", e))?;

        let count = match rows
            .next()
            .await
            .map_err(|e| RagError::runtime("Failed to count chunks", e))?
        {
            Some(row) => match row
                .get_value(0)
                .map_err(|e| RagError::runtime("Failed to read chunk count", e))?
            {
                TursoValue::Integer(n) => n.max(0) as usize,
                _ => 0,
            },
            None => 0,
        };
        Ok(count)
    }

    /// Returns up to `k` chunks ordered by increasing cosine distance to `query`.
    ///
    /// A store holding fewer than `k` chunks returns all of them.
    #[instrument(skip(self), fields(location = %self.location))]
    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredDocument>, RagError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| RagError::runtime("Failed to embed query", e))?;

        // Turso's vector functions expect the vector as a string literal within the query.
        let vector_str = format!(
            "vector32('[{}]')",
            query_vector
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let sql = format!(
            "SELECT content, metadata, vector_distance_cos(embedding, {vector_str}) AS distance
             FROM chunks
             ORDER BY distance ASC
             LIMIT {k};"
        );

        let conn = self
            .db
            .connect()
            .map_err(|e| RagError::runtime("Failed to connect to vector store", e))?;
        let mut rows = conn
            .query(&sql, ())
            .await
            .map_err(|e| RagError::runtime("Vector search failed", e))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| RagError::runtime("Vector search failed", e))?
        {
            let read = |i| {
                row.get_value(i)
                    .map_err(|e| RagError::runtime("Failed to read search result", e))
            };
            let page_content = match read(0)? {
                TursoValue::Text(s) => s,
                _ => String::new(),
            };
            let metadata: BTreeMap<String, String> = match read(1)? {
                TursoValue::Text(s) => serde_json::from_str(&s)
                    .map_err(|e| RagError::runtime("Failed to parse chunk metadata", e))?,
                _ => BTreeMap::new(),
            };
            let distance = match read(2)? {
                TursoValue::Real(f) => f,
                _ => 0.0,
            };
            results.push(ScoredDocument {
                document: Document {
                    page_content,
                    metadata,
                },
                distance,
            });
        }

        Ok(results)
    }

    /// Wraps the store in a retriever returning the top `k` chunks.
    pub fn as_retriever(&self, k: usize) -> Retriever {
        Retriever::new(self.clone(), k)
    }
}

/// Creates and reopens vector stores rooted at a persist directory.
#[derive(Clone)]
pub struct VectorIndex {
    persist_directory: PathBuf,
    embedder: Box<dyn EmbeddingProvider>,
}

impl Debug for VectorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorIndex")
            .field("persist_directory", &self.persist_directory)
            .finish_non_exhaustive()
    }
}

impl VectorIndex {
    pub fn new(persist_directory: impl Into<PathBuf>, embedder: Box<dyn EmbeddingProvider>) -> Self {
        Self {
            persist_directory: persist_directory.into(),
            embedder,
        }
    }

    pub fn persist_directory(&self) -> &Path {
        &self.persist_directory
    }

    /// The database file used when the store is persisted.
    pub fn database_path(&self) -> PathBuf {
        self.persist_directory.join(VECTOR_STORE_FILE_NAME)
    }

    /// Embeds and indexes `chunks`.
    ///
    /// When `persist` is true the store is written to the persist directory (created if
    /// missing) and can later be reopened with [`VectorIndex::load`]; otherwise it lives
    /// in memory for as long as the returned store does.
    pub async fn initiate(&self, chunks: &[Document], persist: bool) -> Result<VectorStore, RagError> {
        let location = if persist {
            tokio::fs::create_dir_all(&self.persist_directory)
                .await
                .map_err(|e| RagError::runtime("Error during db creation", e))?;
            self.database_path().to_string_lossy().into_owned()
        } else {
            IN_MEMORY_LOCATION.to_string()
        };

        let store = VectorStore::open(&location, self.embedder.clone())
            .await
            .map_err(|e| RagError::runtime("Error during db creation", e))?;
        store.add_documents(chunks).await?;
        Ok(store)
    }

    /// Reopens a previously persisted store.
    pub async fn load(&self) -> Result<VectorStore, RagError> {
        let path = self.database_path();
        if !path.exists() {
            return Err(RagError::runtime(
                "Error during db loading",
                anyhow!("no vector store found at '{}'", path.display()),
            ));
        }

        VectorStore::open(&path.to_string_lossy(), self.embedder.clone())
            .await
            .map_err(|e| RagError::runtime("Error during db loading", e))
    }
}
