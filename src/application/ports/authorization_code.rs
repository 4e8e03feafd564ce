// src/application/ports/authorization_code.rs
use crate::application::ApplicationResult;
use crate::domain::oauth::AuthorizationCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    async fn insert(&self, code: AuthorizationCode, now: DateTime<Utc>) -> ApplicationResult<()>;

    /// Atomically mark the code as used and return the stored value.
    ///
    /// Fails with `NotFound`, `Expired` or `AlreadyConsumed`. Under concurrent calls for
    /// the same fingerprint exactly one caller receives the code.
    async fn consume(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationCode>;

    /// Drop every code that expired at or before `cutoff`. Returns how many were removed.
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> ApplicationResult<usize>;
}
