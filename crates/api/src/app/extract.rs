//! Query/body extractors whose rejections answer in the API's JSON shape.
//!
//! Axum's stock extractors reject malformed input with a plain-text body;
//! every response of this API, including validation failures, carries the
//! `{code, message}` envelope, so the rejections are re-wrapped here.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;

use serde::de::DeserializeOwned;

use crate::app::errors;

/// `axum::extract::Query` with a `{code, message}` body on malformed input.
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(errors::json_error(
                rejection.status(),
                errors::CODE_VALIDATION,
                rejection.body_text(),
            )),
        }
    }
}

/// `axum::Json` with a `{code, message}` body on malformed input.
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(errors::json_error(
                rejection.status(),
                errors::CODE_VALIDATION,
                rejection.body_text(),
            )),
        }
    }
}
