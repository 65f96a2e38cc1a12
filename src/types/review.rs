//! Request and greeting payloads

use serde::{Deserialize, Serialize};

/// A piece of text submitted for analysis.
///
/// Unknown fields are ignored; `text` must be present and must be a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub text: String,
}

impl Review {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Body returned by the health-check root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
}

impl Default for Greeting {
    fn default() -> Self {
        Self {
            message: "Hello, World!".to_string(),
        }
    }
}
