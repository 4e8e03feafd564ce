// src/application/ports/token_store.rs
use crate::application::ApplicationResult;
use crate::domain::oauth::{GrantId, RefreshTokenRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert_refresh(
        &self,
        record: RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> ApplicationResult<()>;

    /// Return the refresh token if it is still unused and unexpired.
    async fn find_active_refresh(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<Option<RefreshTokenRecord>>;

    /// Grant of any refresh token the store still knows about, used or not. Used to
    /// detect rotation reuse and to revoke by refresh token.
    async fn grant_of_refresh(&self, fingerprint: &str) -> ApplicationResult<Option<GrantId>>;

    /// Atomically consume a refresh token for rotation. Same failure modes as the code
    /// store: `NotFound`, `Expired`, `AlreadyConsumed`.
    async fn consume_refresh(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<RefreshTokenRecord>;

    /// Mark every token of the grant as revoked from `now` until `until`.
    async fn revoke_grant(
        &self,
        grant_id: &GrantId,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ApplicationResult<()>;

    async fn is_grant_revoked(&self, grant_id: &GrantId) -> ApplicationResult<bool>;

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> ApplicationResult<usize>;
}
