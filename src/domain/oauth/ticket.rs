// src/domain/oauth/ticket.rs
use super::{
    Expiring,
    pkce::PkceChallenge,
    value_objects::{ClientId, RedirectUri, ResponseType, ScopeSet, TicketId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A validated authorization request, as accepted at the authorization endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    pub client_id: ClientId,
    pub response_type: ResponseType,
    pub redirect_uri: RedirectUri,
    pub scope: ScopeSet,
    pub state: Option<String>,
    pub pkce: PkceChallenge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationTicket {
    pub id: TicketId,
    pub request: AuthorizationRequest,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Expiring for AuthorizationTicket {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
