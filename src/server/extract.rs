//! JSON body extractor with schema-violation responses.
//!
//! Axum's plain `Json` answers syntax errors with `400` and missing
//! content types with `415`. Every way a body can fail to match the
//! request schema is reported as `422` here instead.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// A JSON body deserialized into `T`, rejected with `422` on mismatch.
///
/// # Example
///
/// ```rust,ignore
/// async fn analyze(ValidatedJson(review): ValidatedJson<Review>) -> Response {
///     // review.text is guaranteed to be a string here
/// }
/// ```
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        Ok(ValidatedJson(data))
    }
}
