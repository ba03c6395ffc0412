//! # Shared Constants

/// The model used when neither the request nor the client names one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// The default OpenAI-compatible chat completions endpoint.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default number of chunks returned by a retriever.
pub const DEFAULT_RETRIEVER_K: usize = 3;

/// The file name of a persisted vector store inside its directory.
pub const VECTOR_STORE_FILE_NAME: &str = "vectors.db";
