//! # Providers
//!
//! Adapters for the external services this crate talks to: chat completion
//! endpoints and embedding endpoints.

pub mod ai;
pub mod factory;
