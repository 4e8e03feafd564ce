// src/application/dto/oauth.rs
use crate::domain::oauth::{AuthorizationTicket, TicketId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone)]
pub struct IssuedTicket {
    pub ticket: TicketId,
    pub expires_at: DateTime<Utc>,
}

/// What a consent screen needs to render before the subject decides.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PendingAuthorizationDto {
    pub ticket: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(with = "serde_time")]
    pub expires_at: DateTime<Utc>,
}

impl From<AuthorizationTicket> for PendingAuthorizationDto {
    fn from(ticket: AuthorizationTicket) -> Self {
        Self {
            ticket: ticket.id.to_string(),
            client_id: ticket.request.client_id.to_string(),
            redirect_uri: ticket.request.redirect_uri.to_string(),
            scope: ticket.request.scope.to_string(),
            state: ticket.request.state,
            expires_at: ticket.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentOutcome {
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub scope: String,
}

/// RFC 7662 response body. Inactive tokens carry nothing but `active: false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IntrospectionDto {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl IntrospectionDto {
    pub fn inactive() -> Self {
        Self::default()
    }
}
