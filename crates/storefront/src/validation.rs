//! Request body validation.
//!
//! Handlers take [`ValidJson<T>`] instead of `Json<T>`. The body is
//! deserialized and then checked with [`Validate`]; any failure becomes a
//! 400 listing every problem found. Bodies that are turned into a richer
//! value by the handler itself use [`JsonBody<T>`], which only maps
//! deserialization failures:
//!
//! ```json
//! { "message": "Invalid data", "errors": [{ "path": "quantity", "message": "..." }] }
//! ```

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::error::AppError;

/// One validation problem, located by a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Collected validation problems for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid data ({} error(s))", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty error list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding a single error.
    #[must_use]
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(path, message);
        errors
    }

    /// Record a problem at `path`.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Record a problem if `check` is false.
    pub fn require(&mut self, check: bool, path: impl Into<String>, message: impl Into<String>) {
        if !check {
            self.push(path, message);
        }
    }

    /// The recorded problems.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` if nothing was recorded, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any problem was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<JsonRejection> for ValidationErrors {
    fn from(rejection: JsonRejection) -> Self {
        Self::single("", rejection.body_text())
    }
}

/// Checks a deserialized request body.
pub trait Validate {
    /// Check the value, collecting every problem.
    ///
    /// # Errors
    ///
    /// Returns the collected problems if the value is invalid.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// JSON body extractor whose rejection is a validation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationErrors::from)?;
        Ok(Self(value))
    }
}

/// JSON body extractor that also runs [`Validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}
