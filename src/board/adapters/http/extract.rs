//! Request extractors whose rejections use the board error body.
//!
//! Axum's own extractors answer malformed input with a plain-text body.
//! These wrappers keep the rejection's status but render it as
//! [`super::ErrorBody`] JSON like every other board failure.

use super::error::HttpError;
use async_trait::async_trait;
use axum::{
    Form, Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// [`Path`] with a JSON rejection.
#[derive(Debug, Clone, Copy)]
pub struct BoardPath<T>(pub T);

/// [`Query`] with a JSON rejection.
#[derive(Debug, Clone)]
pub struct BoardQuery<T>(pub T);

/// [`Json`] with a JSON rejection.
#[derive(Debug, Clone)]
pub struct BoardJson<T>(pub T);

/// [`Form`] with a JSON rejection.
#[derive(Debug, Clone)]
pub struct BoardForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for BoardPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for BoardQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for BoardJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for BoardForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(request, state).await?;
        Ok(Self(value))
    }
}
