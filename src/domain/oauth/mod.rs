// src/domain/oauth/mod.rs
pub mod client;
pub mod code;
pub mod pkce;
pub mod ticket;
pub mod token;
pub mod value_objects;

use chrono::{DateTime, Utc};

pub use client::Client;
pub use code::AuthorizationCode;
pub use pkce::{CodeChallengeMethod, PkceChallenge};
pub use ticket::{AuthorizationRequest, AuthorizationTicket};
pub use token::{AccessTokenClaims, RefreshTokenRecord, TokenKind, TokenParent};
pub use value_objects::{
    ClientId, GrantId, GrantType, RedirectUri, ResponseType, ScopeSet, Subject, TicketId,
    fingerprint,
};

/// Records with a hard expiry. Stores use this to reject expired entries and to sweep.
pub trait Expiring {
    fn expires_at(&self) -> DateTime<Utc>;

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}
