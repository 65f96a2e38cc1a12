//! HTTP server.
//!
//! This module provides:
//! - The route table and handlers (`routes`)
//! - A JSON extractor reporting schema violations as `422` (`extract`)
//! - Error-to-response mapping (`error`)
//! - Configuration types (`config`, requires `local-inference`)

#[cfg(feature = "local-inference")]
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

pub use error::{ApiError, ValidationDetail};
pub use extract::ValidatedJson;
pub use routes::{AppState, build_router};
