//! # Prompt Templates
//!
//! This module organizes the default system prompts used by [`crate::PromptClient`]
//! and the chat template helpers used to build custom single-step chains.

pub mod classification;
pub mod pii;
pub mod tagging;
pub mod template;

pub use template::{build_prompt, ChatPromptTemplate, PromptChain};
