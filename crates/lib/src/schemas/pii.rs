use crate::structured::StructuredResponse;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// One detected piece of personally identifiable information.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct PiiRecord {
    pub index: u32,
    /// The type of the PII value found
    pub data_type: String,
    /// The PII value found
    pub pii_value: String,
}

impl PiiRecord {
    pub fn new(index: u32, data_type: impl Into<String>, pii_value: impl Into<String>) -> Self {
        Self {
            index,
            data_type: data_type.into(),
            pii_value: pii_value.into(),
        }
    }
}

/// Extracted PII data from a document, all data_type values should try to have consistent property names
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq, Default)]
pub struct PiiData {
    /// A list of the PII data found in the document
    pub pii_data: Vec<PiiRecord>,
}

impl PiiData {
    pub fn new(pii_data: Vec<PiiRecord>) -> Self {
        Self { pii_data }
    }

    /// Replaces every PII value in `content` with a placeholder of the form
    /// `<{data_type}_{i}>`, where `i` is the record's position in the list.
    ///
    /// Replacement is literal and unscoped: every occurrence of a value is replaced,
    /// wherever it appears. Records are applied in list order, so a value that is a
    /// substring of a later value changes what the later record can still match.
    /// Records with an empty value are skipped.
    pub fn scrub_data(&self, content: &str) -> String {
        let mut scrubbed = content.to_string();

        for (i, data) in self.pii_data.iter().enumerate() {
            if data.pii_value.is_empty() {
                warn!(
                    "Skipping PII record {} ({}) with an empty value.",
                    i, data.data_type
                );
                continue;
            }
            scrubbed = scrubbed.replace(&data.pii_value, &format!("<{}_{i}>", data.data_type));
        }

        scrubbed
    }
}

impl StructuredResponse for PiiData {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for record in &self.pii_data {
            if !seen.insert(record.index) {
                return Err(format!("duplicate PII index {}", record.index));
            }
            if record.pii_value.is_empty() {
                return Err(format!("PII record {} has an empty value", record.index));
            }
        }
        Ok(())
    }
}
