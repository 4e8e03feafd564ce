// src/presentation/http/controllers/discovery.rs
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub jwks_uri: String,
    pub revocation_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introspection_endpoint: Option<String>,

    pub response_types_supported: Vec<String>,
    pub response_modes_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub subject_types_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/.well-known/openid-configuration",
    responses(
        (status = 200, description = "OpenID Connect Discovery document", body = OpenIdConfiguration),
    ),
    tag = "Discovery"
)]
pub async fn openid_configuration(
    Extension(state): Extension<HttpState>,
) -> Json<OpenIdConfiguration> {
    let base = state.issuer.as_ref();

    let mut code_challenge_methods = vec!["S256".to_string()];
    if state.allow_plain_pkce {
        code_challenge_methods.push("plain".into());
    }

    Json(OpenIdConfiguration {
        issuer: base.to_string(),
        authorization_endpoint: format!("{base}/auth"),
        token_endpoint: format!("{base}/token"),
        jwks_uri: format!("{base}/.well-known/jwks.json"),
        revocation_endpoint: format!("{base}/revoke"),
        introspection_endpoint: state
            .introspection_key
            .as_ref()
            .map(|_| format!("{base}/introspect")),

        response_types_supported: vec!["code".into()],
        response_modes_supported: vec!["query".into()],
        grant_types_supported: vec!["authorization_code".into(), "refresh_token".into()],
        subject_types_supported: vec!["public".into()],
        token_endpoint_auth_methods_supported: vec!["client_secret_post".into()],
        code_challenge_methods_supported: code_challenge_methods,
    })
}

#[utoipa::path(
    get,
    path = "/.well-known/jwks.json",
    responses(
        (status = 200, description = "JSON Web Key Set used to verify access tokens", body = Object),
    ),
    tag = "Discovery"
)]
pub async fn jwks(Extension(state): Extension<HttpState>) -> HttpResult<Json<serde_json::Value>> {
    let keys = state.services.jwks().await.into_http()?;
    Ok(Json(keys))
}
