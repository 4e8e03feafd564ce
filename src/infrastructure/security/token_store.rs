// src/infrastructure/security/token_store.rs
use super::one_shot::{OneShotMap, Peek};
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::token_store::TokenStore;
use crate::domain::oauth::{Expiring, GrantId, RefreshTokenRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

pub struct InMemoryTokenStore {
    refresh: OneShotMap<RefreshTokenRecord>,
    // grant id -> revoked until
    revoked_grants: RwLock<HashMap<GrantId, DateTime<Utc>>>,
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self {
            refresh: OneShotMap::new("refresh token"),
            revoked_grants: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned() -> ApplicationError {
    ApplicationError::infrastructure("grant revocation lock poisoned")
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn insert_refresh(
        &self,
        record: RefreshTokenRecord,
        _now: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        self.refresh.insert(record.fingerprint.clone(), record)
    }

    async fn find_active_refresh(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<Option<RefreshTokenRecord>> {
        Ok(match self.refresh.peek(fingerprint)? {
            Peek::Pending(record) if !record.is_expired_at(now) => Some(record),
            _ => None,
        })
    }

    async fn grant_of_refresh(&self, fingerprint: &str) -> ApplicationResult<Option<GrantId>> {
        Ok(match self.refresh.peek(fingerprint)? {
            Peek::Pending(record) | Peek::Consumed(record) => Some(record.grant_id),
            Peek::Missing => None,
        })
    }

    async fn consume_refresh(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<RefreshTokenRecord> {
        self.refresh.consume(fingerprint, now)
    }

    async fn revoke_grant(
        &self,
        grant_id: &GrantId,
        _now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        let mut guard = self.revoked_grants.write().map_err(|_| poisoned())?;
        let entry = guard.entry(grant_id.clone()).or_insert(until);
        if *entry < until {
            *entry = until;
        }
        Ok(())
    }

    async fn is_grant_revoked(&self, grant_id: &GrantId) -> ApplicationResult<bool> {
        let guard = self.revoked_grants.read().map_err(|_| poisoned())?;
        Ok(guard.contains_key(grant_id))
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut removed = self.refresh.purge_expired(cutoff)?;
        let mut guard = self.revoked_grants.write().map_err(|_| poisoned())?;
        let before = guard.len();
        guard.retain(|_, until| *until > cutoff);
        removed += before - guard.len();
        Ok(removed)
    }
}
