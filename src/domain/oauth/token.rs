// src/domain/oauth/token.rs
use super::{
    Expiring,
    value_objects::{ClientId, GrantId, ScopeSet, Subject},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }
}

/// What a refresh token was minted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "fingerprint", rename_all = "snake_case")]
pub enum TokenParent {
    Code(String),
    Refresh(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub fingerprint: String,
    pub grant_id: GrantId,
    pub client_id: ClientId,
    pub subject: Subject,
    pub scope: ScopeSet,
    pub parent: TokenParent,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Expiring for RefreshTokenRecord {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Claims sealed into a self-contained access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenClaims {
    pub token_id: String,
    pub grant_id: GrantId,
    pub client_id: ClientId,
    pub subject: Subject,
    pub scope: ScopeSet,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Expiring for AccessTokenClaims {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
