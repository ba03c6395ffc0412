//! # Response Schemas
//!
//! The structured shapes model calls are asked to return. Each type derives its JSON
//! schema with `schemars` and implements [`crate::structured::StructuredResponse`].

pub mod classification;
pub mod pii;
pub mod tagging;

pub use classification::{Label, MultiClassPrediction};
pub use pii::{PiiData, PiiRecord};
pub use tagging::{
    Information, Intensity, IntensityLevel, KeyWord, Overview, Person, Sentiment, SentimentValues,
};
