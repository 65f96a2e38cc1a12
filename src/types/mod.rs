//! Public types for the sentiment service API.

mod classification;
mod review;

pub use classification::{ClassificationResult, LabelMap, LabelScore};
pub use review::{Greeting, Review};
