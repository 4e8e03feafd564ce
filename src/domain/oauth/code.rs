// src/domain/oauth/code.rs
use super::{
    Expiring,
    pkce::PkceChallenge,
    value_objects::{ClientId, GrantId, RedirectUri, ScopeSet, Subject},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization code as persisted. The raw code is handed to the client once and only
/// its fingerprint is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCode {
    pub fingerprint: String,
    pub client_id: ClientId,
    pub redirect_uri: RedirectUri,
    pub scope: ScopeSet,
    pub subject: Subject,
    pub pkce: PkceChallenge,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthorizationCode {
    pub fn grant_id(&self) -> GrantId {
        GrantId::for_code_fingerprint(&self.fingerprint)
    }
}

impl Expiring for AuthorizationCode {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
