//! Prompts for tagging and structured extraction.

/// The default system prompt for [`crate::PromptClient::tag_overview`].
pub const OVERVIEW_SYSTEM_PROMPT: &str = r#"You are an expert text analyst. Produce an overview of the text: a concise summary, its sentiment (Negative, Neutral or Positive), its most important keywords, information about every person mentioned (name, age in years and profession when stated), and its overall intensity as an integer from 1 (low) to 3 (high)."#;

/// The default system prompt for [`crate::PromptClient::extract_people`].
pub const PEOPLE_EXTRACTION_SYSTEM_PROMPT: &str = r#"Extract information about every person mentioned in the text. For each person return their name, their age in years, and their profession or job if the text states it; otherwise leave the profession null. Only extract what the text says."#;

/// The default system prompt for [`crate::PromptClient::detect_sentiment`].
pub const SENTIMENT_SYSTEM_PROMPT: &str = r#"Classify the sentiment of the text as exactly one of: Negative, Neutral, Positive."#;

/// The default system prompt for [`crate::PromptClient::detect_intensity`].
pub const INTENSITY_SYSTEM_PROMPT: &str = r#"Rate the emotional intensity of the text as an integer: 1 for low, 2 for medium, 3 for high."#;
