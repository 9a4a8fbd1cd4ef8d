//! Extractors that deserialize and then validate request input.
//!
//! Framework rejections are mapped onto [`AppError`] so every client error
//! shares the same JSON envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;
use crate::validate::Validate;

/// JSON body that passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

/// Path parameters that passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

/// Query string that passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

fn unparseable(source: &str, reason: String) -> AppError {
    AppError::validation(
        vec![json!({ "field": source, "error": reason })],
        format!("request {source} could not be parsed"),
    )
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => unparseable("body", err.body_text()),
            other => AppError::bad_request(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        unparseable("path", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        unparseable("query", rejection.body_text())
    }
}

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.check()?;
        Ok(Self(value))
    }
}

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        value.check()?;
        Ok(Self(value))
    }
}

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.check()?;
        Ok(Self(value))
    }
}
