use crate::structured::StructuredResponse;
use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Serialize};

/// How intense a piece of text is, on a 1–3 scale.
///
/// Serialized as its integer value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum IntensityLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl TryFrom<u8> for IntensityLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(IntensityLevel::Low),
            2 => Ok(IntensityLevel::Medium),
            3 => Ok(IntensityLevel::High),
            other => Err(format!("invalid intensity level {other}, expected 1, 2 or 3")),
        }
    }
}

impl From<IntensityLevel> for u8 {
    fn from(level: IntensityLevel) -> Self {
        level as u8
    }
}

impl JsonSchema for IntensityLevel {
    fn schema_name() -> String {
        "IntensityLevel".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::Integer.into()),
            enum_values: Some(vec![1.into(), 2.into(), 3.into()]),
            ..Default::default()
        }
        .into()
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentValues {
    Negative,
    Neutral,
    Positive,
}

/// Information about a person.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// person's name
    pub name: String,
    /// The age of a person in years
    pub age: u32,
    /// The profession or job of a person
    #[serde(default)]
    pub profession: Option<String>,
}

/// Information to extract.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq, Default)]
pub struct Information {
    /// List of information about people
    pub people: Vec<Person>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct KeyWord {
    /// A keyword extracted from the text
    pub word: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intensity {
    /// The intensity level of the text.
    pub intensity: IntensityLevel,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentiment {
    /// The sentiment of the text.
    pub sentiment: SentimentValues,
}

/// Overview of a section of text.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    /// A concise summary of the content.
    pub summary: String,
    /// The sentiment of the content.
    pub sentiment: Sentiment,
    /// Keywords related to the content.
    pub keywords: Vec<KeyWord>,
    /// Information extracted about people in the text.
    pub people: Vec<Information>,
    /// The overall intensity of the text.
    pub intensity: IntensityLevel,
}

impl StructuredResponse for Information {}
impl StructuredResponse for Intensity {}
impl StructuredResponse for Sentiment {}
impl StructuredResponse for Overview {}
