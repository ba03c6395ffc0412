//! Prompts for PII extraction.

/// The default system prompt for [`crate::PromptClient::extract_pii`].
pub const PII_EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a world class PII scrubbing model. Extract every piece of personally identifiable information from the document: names, email addresses, phone numbers, postal addresses, dates of birth, account and identification numbers. For each item return a unique, zero-based `index`, a consistent lowercase `data_type` (for example "name", "email", "phone", "address") and the exact `pii_value` as it appears in the text, character for character."#;
