// src/presentation/http/openapi.rs
use axum::{Router, response::Redirect, routing::get};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufWriter, path::Path};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

pub const DEFAULT_SNAPSHOT_PATH: &str = "spec/openapi.json";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::authorization::request_authorization,
        crate::presentation::http::controllers::authorization::pending_authorization,
        crate::presentation::http::controllers::authorization::consent,
        crate::presentation::http::controllers::token::token,
        crate::presentation::http::controllers::token::revoke,
        crate::presentation::http::controllers::introspection::introspect,
        crate::presentation::http::controllers::discovery::openid_configuration,
        crate::presentation::http::controllers::discovery::jwks,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::authorization::AuthorizationRequestBody,
            crate::presentation::http::controllers::authorization::TicketResponse,
            crate::presentation::http::controllers::authorization::ConsentRequest,
            crate::presentation::http::controllers::authorization::ConsentResponse,
            crate::presentation::http::controllers::authorization::MemberId,
            crate::presentation::http::controllers::token::TokenRequest,
            crate::presentation::http::controllers::token::RevokeRequest,
            crate::presentation::http::controllers::introspection::IntrospectionRequest,
            crate::presentation::http::controllers::discovery::OpenIdConfiguration,
            crate::application::dto::PendingAuthorizationDto,
            crate::application::dto::TokenPairDto,
            crate::application::dto::IntrospectionDto
        )
    ),
    tags(
        (name = "Authorization", description = "Authorization requests and consent"),
        (name = "Token", description = "Token issuance, revocation and introspection"),
        (name = "Discovery", description = "Server metadata and signing keys"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    info(
        title = "authgate",
        description = "OAuth 2.0 authorization code + PKCE server",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        components.add_security_scheme(
            "apiKey",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub fn docs_router() -> Router {
    let openapi = ApiDoc::openapi();
    let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi.clone());
    let redoc = Redoc::with_url("/redoc", openapi);
    Router::new()
        .merge(swagger)
        .merge(redoc)
        .route("/", get(|| async { Redirect::permanent("/docs") }))
}

pub fn write_openapi_snapshot(path: impl AsRef<Path>) -> std::io::Result<()> {
    let spec = ApiDoc::openapi();
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &spec)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_oauth_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth",
            "/auth/tickets/{ticket}",
            "/consent",
            "/token",
            "/revoke",
            "/introspect",
            "/.well-known/openid-configuration",
            "/.well-known/jwks.json",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
