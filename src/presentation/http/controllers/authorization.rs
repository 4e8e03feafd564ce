// src/presentation/http/controllers/authorization.rs
use crate::application::{
    commands::{consent::ConsentCommand, tickets::CreateTicketCommand},
    dto::PendingAuthorizationDto,
};
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::OAuthJson,
    state::HttpState,
};
use axum::{Extension, Json, extract::Path};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthorizationRequestBody {
    pub client_id: String,
    pub response_type: String,
    pub redirect_uri: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub code_challenge: Option<String>,
    /// `S256` or `plain`; absent means `plain`.
    #[serde(default)]
    pub code_challenge_method: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    pub ticket: String,
    pub expires_at: DateTime<Utc>,
}

/// Subject identifier as sent by the login front-end; numbers and strings are both accepted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum MemberId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

const fn approved_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConsentRequest {
    pub ticket: String,
    pub member_id: MemberId,
    #[serde(default = "approved_by_default")]
    pub approved: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConsentResponse {
    /// Where the user agent should be sent next.
    pub redirect_to: String,
}

#[utoipa::path(
    post,
    path = "/auth",
    request_body = AuthorizationRequestBody,
    responses(
        (status = 200, description = "Authorization request accepted; a consent ticket was issued", body = TicketResponse),
        (status = 400, description = "Invalid authorization request", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Authorization"
)]
pub async fn request_authorization(
    Extension(state): Extension<HttpState>,
    OAuthJson(payload): OAuthJson<AuthorizationRequestBody>,
) -> HttpResult<Json<TicketResponse>> {
    let command = CreateTicketCommand {
        client_id: payload.client_id,
        response_type: payload.response_type,
        redirect_uri: payload.redirect_uri,
        scope: payload.scope,
        state: payload.state,
        code_challenge: payload.code_challenge,
        code_challenge_method: payload.code_challenge_method,
    };

    let issued = state.services.tickets.create(command).await.into_http()?;
    Ok(Json(TicketResponse {
        ticket: issued.ticket.to_string(),
        expires_at: issued.expires_at,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/tickets/{ticket}",
    params(("ticket" = String, Path, description = "Ticket returned by POST /auth")),
    responses(
        (status = 200, description = "Pending authorization awaiting consent", body = PendingAuthorizationDto),
        (status = 400, description = "Unknown, expired or used ticket", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Authorization"
)]
pub async fn pending_authorization(
    Extension(state): Extension<HttpState>,
    Path(ticket): Path<String>,
) -> HttpResult<Json<PendingAuthorizationDto>> {
    let pending = state
        .services
        .ticket_queries
        .pending(&ticket)
        .await
        .into_http()?;
    Ok(Json(pending))
}

#[utoipa::path(
    post,
    path = "/consent",
    request_body = ConsentRequest,
    responses(
        (status = 200, description = "Consent recorded; redirect the user agent", body = ConsentResponse),
        (status = 400, description = "Unknown, expired or used ticket", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Authorization"
)]
pub async fn consent(
    Extension(state): Extension<HttpState>,
    OAuthJson(payload): OAuthJson<ConsentRequest>,
) -> HttpResult<Json<ConsentResponse>> {
    let outcome = state
        .services
        .consent
        .decide(ConsentCommand {
            ticket: payload.ticket,
            subject: payload.member_id.to_string(),
            approved: payload.approved,
        })
        .await
        .into_http()?;

    Ok(Json(ConsentResponse {
        redirect_to: outcome.redirect_to,
    }))
}
