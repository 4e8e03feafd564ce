// src/infrastructure/security/authorization_code_store.rs
use super::one_shot::OneShotMap;
use crate::application::ApplicationResult;
use crate::application::ports::authorization_code::AuthorizationCodeStore;
use crate::domain::oauth::AuthorizationCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Codes keyed by fingerprint; the raw code never reaches the store.
pub struct InMemoryAuthorizationCodeStore {
    codes: OneShotMap<AuthorizationCode>,
}

impl Default for InMemoryAuthorizationCodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthorizationCodeStore {
    pub fn new() -> Self {
        Self {
            codes: OneShotMap::new("authorization code"),
        }
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryAuthorizationCodeStore {
    async fn insert(&self, code: AuthorizationCode, _now: DateTime<Utc>) -> ApplicationResult<()> {
        self.codes.insert(code.fingerprint.clone(), code)
    }

    async fn consume(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationCode> {
        self.codes.consume(fingerprint, now)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> ApplicationResult<usize> {
        self.codes.purge_expired(cutoff)
    }
}
