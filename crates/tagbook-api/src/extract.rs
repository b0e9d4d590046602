//! JSON body extractor whose rejections render as [`ApiError`].
//!
//! Axum's own [`Json`] rejects with plain-text 415/422 responses; every
//! body problem here is a 400 with the usual `{"error": ...}` payload.

use axum::{
  Json,
  extract::{FromRequest, OptionalFromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// A JSON request body.
///
/// As `Option<JsonBody<T>>` a request without a `Content-Type` header yields
/// `None` instead of a rejection.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
    Ok(Self(value))
  }
}

impl<T, S> OptionalFromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
    let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
    Ok(body.map(|Json(value)| Self(value)))
  }
}
