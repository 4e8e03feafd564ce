// src/presentation/http/controllers/introspection.rs
use crate::application::{dto::IntrospectionDto, queries::introspection::IntrospectionQuery};
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::{OAuthJson, ResourceServer},
    state::HttpState,
};
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct IntrospectionRequest {
    pub token: String,
    /// Space-delimited scopes the token must carry to be reported active.
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type_hint: Option<String>,
}

#[utoipa::path(
    post,
    path = "/introspect",
    request_body = IntrospectionRequest,
    responses(
        (status = 200, description = "Token introspection (RFC 7662)", body = IntrospectionDto),
        (status = 401, description = "Missing or invalid API key", body = crate::presentation::http::error::ErrorResponse),
    ),
    security(("apiKey" = [])),
    tag = "Token"
)]
pub async fn introspect(
    Extension(state): Extension<HttpState>,
    _caller: ResourceServer,
    OAuthJson(payload): OAuthJson<IntrospectionRequest>,
) -> HttpResult<Json<IntrospectionDto>> {
    let result = state
        .services
        .introspection
        .introspect(IntrospectionQuery {
            token: payload.token,
            scope: payload.scope,
        })
        .await
        .into_http()?;
    Ok(Json(result))
}
