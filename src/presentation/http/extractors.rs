// src/presentation/http/extractors.rs
use crate::presentation::http::state::HttpState;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::request::Parts,
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use serde::de::DeserializeOwned;
use subtle::ConstantTimeEq;

use super::error::HttpError;

/// JSON body whose rejections are reported as OAuth `invalid_request` errors.
#[derive(Debug, Clone)]
pub struct OAuthJson<T>(pub T);

impl<T, S> FromRequest<S> for OAuthJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection)),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> HttpError {
    HttpError::invalid_request(rejection.body_text())
}

/// A resource server authenticated with the introspection API key.
#[derive(Debug, Clone, Copy)]
pub struct ResourceServer;

impl<S> FromRequestParts<S> for ResourceServer
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let expected = parts
            .extensions
            .get::<HttpState>()
            .and_then(|state| state.introspection_key.clone())
            .ok_or_else(|| HttpError::invalid_client("introspection is not enabled"))?;

        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| HttpError::invalid_client("missing Authorization header"))?;

        if bool::from(header.token().as_bytes().ct_eq(expected.as_bytes())) {
            Ok(Self)
        } else {
            Err(HttpError::invalid_client("invalid API key"))
        }
    }
}
