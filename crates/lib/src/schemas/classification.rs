use crate::structured::StructuredResponse;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A support ticket category.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Billing,
    Operations,
    Sales,
    #[serde(rename = "complaint")]
    Complaints,
    GeneralQuery,
}

impl Label {
    pub const ALL: [Label; 5] = [
        Label::Billing,
        Label::Operations,
        Label::Sales,
        Label::Complaints,
        Label::GeneralQuery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Billing => "billing",
            Label::Operations => "operations",
            Label::Sales => "sales",
            Label::Complaints => "complaint",
            Label::GeneralQuery => "general_query",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A multi-label classification of a piece of content, with the reasoning that led to it.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct MultiClassPrediction {
    /// The relevant labels assigned to the content. There may be multiple relevant labels to add.
    pub predicted_labels: Vec<Label>,
    /// Think step-by-step in order to arrive at an answer.
    pub chain_of_thought: String,
}

impl MultiClassPrediction {
    pub fn has_label(&self, label: Label) -> bool {
        self.predicted_labels.contains(&label)
    }
}

impl StructuredResponse for MultiClassPrediction {}
