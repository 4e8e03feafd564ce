// src/presentation/http/controllers/token.rs
use crate::application::{
    commands::tokens::{ExchangeCodeCommand, RefreshTokenCommand, RevokeTokenCommand},
    dto::TokenPairDto,
};
use crate::domain::oauth::GrantType;
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::OAuthJson,
    openapi::StatusResponse,
    state::HttpState,
};
use axum::{
    Extension, Json,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub grant_type: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub code_verifier: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Narrower scope for a refresh grant.
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RevokeRequest {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub token: String,
    #[serde(default)]
    pub token_type_hint: Option<String>,
}

#[utoipa::path(
    post,
    path = "/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairDto),
        (status = 400, description = "Invalid grant or request", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Client authentication failed", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Token"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    OAuthJson(payload): OAuthJson<TokenRequest>,
) -> HttpResult<Response> {
    let tokens = &state.services.tokens;
    let pair = if payload.grant_type == GrantType::RefreshToken.as_str() {
        tokens
            .refresh(RefreshTokenCommand {
                refresh_token: payload.refresh_token,
                scope: payload.scope,
                client_id: payload.client_id,
                client_secret: payload.client_secret,
            })
            .await
    } else {
        tokens
            .exchange(ExchangeCodeCommand {
                grant_type: payload.grant_type,
                code: payload.code,
                redirect_uri: payload.redirect_uri,
                code_verifier: payload.code_verifier,
                client_id: payload.client_id,
                client_secret: payload.client_secret,
                state: payload.state,
            })
            .await
    }
    .into_http()?;

    Ok((
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(pair),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/revoke",
    request_body = RevokeRequest,
    responses(
        (status = 200, description = "Revocation acknowledged (also for unknown tokens)", body = StatusResponse),
        (status = 401, description = "Client authentication failed", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Token"
)]
pub async fn revoke(
    Extension(state): Extension<HttpState>,
    OAuthJson(payload): OAuthJson<RevokeRequest>,
) -> HttpResult<Json<StatusResponse>> {
    state
        .services
        .tokens
        .revoke(RevokeTokenCommand {
            token: payload.token,
            token_type_hint: payload.token_type_hint,
            client_id: payload.client_id,
            client_secret: payload.client_secret,
        })
        .await
        .into_http()?;

    Ok(Json(StatusResponse {
        status: "revoked".into(),
    }))
}
