// src/infrastructure/security/redis_store.rs
//! Redis-backed ticket, code and refresh token stores.
//!
//! A pending record lives in a hash `{ns}:pending:{key}` holding the JSON record and its
//! expiry in epoch milliseconds. Consumption runs as one Lua script that moves the record
//! to `{ns}:consumed:{key}`, so two concurrent consumers can never both win. The consumed
//! marker keeps the record body for reuse detection and expires with the original key.

use super::one_shot::Peek;
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    authorization_code::AuthorizationCodeStore, ticket_store::TicketStore,
    token_store::TokenStore,
};
use crate::domain::oauth::{
    AuthorizationCode, AuthorizationTicket, Expiring, GrantId, RefreshTokenRecord, TicketId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::{Serialize, de::DeserializeOwned};

const KEY_PREFIX: &str = "authgate";
// Keys outlive the record's own expiry so a late replay is still recognised.
const KEY_GRACE_SECS: i64 = 300;

const INSERT_SCRIPT: &str = r"
    if redis.call('EXISTS', KEYS[1]) == 1 or redis.call('EXISTS', KEYS[2]) == 1 then
        return 0
    end
    redis.call('HSET', KEYS[1], 'record', ARGV[1], 'expires_at', ARGV[2])
    redis.call('EXPIRE', KEYS[1], ARGV[3])
    return 1
";

const PEEK_SCRIPT: &str = r"
    local used = redis.call('GET', KEYS[2])
    if used then return 'consumed:' .. used end
    local record = redis.call('HGET', KEYS[1], 'record')
    if record then return 'pending:' .. record end
    return 'missing'
";

const CONSUME_SCRIPT: &str = r"
    if redis.call('EXISTS', KEYS[2]) == 1 then return 'consumed' end
    local record = redis.call('HGET', KEYS[1], 'record')
    if not record then return 'missing' end
    local expires_at = tonumber(redis.call('HGET', KEYS[1], 'expires_at'))
    if expires_at <= tonumber(ARGV[1]) then return 'expired' end
    local ttl = redis.call('PTTL', KEYS[1])
    if ttl < 1 then ttl = 1000 end
    redis.call('SET', KEYS[2], record, 'PX', ttl)
    redis.call('DEL', KEYS[1])
    return 'ok:' .. record
";

fn infra(err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::infrastructure(err.to_string())
}

/// Create a connection pool from a redis URL (e.g. `redis://:password@host:6379/0`).
pub fn create_pool(url: &str) -> ApplicationResult<Pool> {
    DeadpoolConfig::from_url(url)
        .create_pool(Some(Runtime::Tokio1))
        .map_err(infra)
}

#[derive(Clone)]
struct RedisOneShot {
    pool: Pool,
    namespace: String,
    label: &'static str,
}

impl RedisOneShot {
    fn new(pool: Pool, namespace: &str, label: &'static str) -> Self {
        Self {
            pool,
            namespace: format!("{KEY_PREFIX}:{namespace}"),
            label,
        }
    }

    async fn conn(&self) -> ApplicationResult<Connection> {
        self.pool.get().await.map_err(infra)
    }

    fn keys(&self, key: &str) -> (String, String) {
        (
            format!("{}:pending:{key}", self.namespace),
            format!("{}:consumed:{key}", self.namespace),
        )
    }

    async fn insert<T>(&self, key: &str, record: &T, now: DateTime<Utc>) -> ApplicationResult<()>
    where
        T: Serialize + Expiring + Sync,
    {
        let body = serde_json::to_string(record).map_err(infra)?;
        let remaining = (record.expires_at() - now).num_seconds().max(1);
        let (pending, consumed) = self.keys(key);

        let mut conn = self.conn().await?;
        let inserted: i32 = redis::cmd("EVAL")
            .arg(INSERT_SCRIPT)
            .arg(2)
            .arg(&pending)
            .arg(&consumed)
            .arg(body)
            .arg(record.expires_at().timestamp_millis())
            .arg(remaining + KEY_GRACE_SECS)
            .query_async(&mut conn)
            .await
            .map_err(infra)?;

        if inserted == 1 {
            Ok(())
        } else {
            Err(ApplicationError::infrastructure(format!(
                "duplicate {} key",
                self.label
            )))
        }
    }

    async fn peek<T: DeserializeOwned>(&self, key: &str) -> ApplicationResult<Peek<T>> {
        let (pending, consumed) = self.keys(key);
        let mut conn = self.conn().await?;
        let reply: String = redis::cmd("EVAL")
            .arg(PEEK_SCRIPT)
            .arg(2)
            .arg(&pending)
            .arg(&consumed)
            .query_async(&mut conn)
            .await
            .map_err(infra)?;

        if let Some(body) = reply.strip_prefix("pending:") {
            Ok(Peek::Pending(serde_json::from_str(body).map_err(infra)?))
        } else if let Some(body) = reply.strip_prefix("consumed:") {
            Ok(Peek::Consumed(serde_json::from_str(body).map_err(infra)?))
        } else {
            Ok(Peek::Missing)
        }
    }

    async fn resolve<T>(&self, key: &str, now: DateTime<Utc>) -> ApplicationResult<T>
    where
        T: DeserializeOwned + Expiring,
    {
        match self.peek::<T>(key).await? {
            Peek::Pending(record) if record.is_expired_at(now) => Err(self.expired()),
            Peek::Pending(record) => Ok(record),
            Peek::Consumed(_) => Err(self.already_consumed()),
            Peek::Missing => Err(self.not_found()),
        }
    }

    async fn consume<T: DeserializeOwned>(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<T> {
        let (pending, consumed) = self.keys(key);
        let mut conn = self.conn().await?;
        let reply: String = redis::cmd("EVAL")
            .arg(CONSUME_SCRIPT)
            .arg(2)
            .arg(&pending)
            .arg(&consumed)
            .arg(now.timestamp_millis())
            .query_async(&mut conn)
            .await
            .map_err(infra)?;

        match reply.as_str() {
            "consumed" => Err(self.already_consumed()),
            "expired" => Err(self.expired()),
            "missing" => Err(self.not_found()),
            other => {
                let body = other.strip_prefix("ok:").ok_or_else(|| {
                    ApplicationError::infrastructure(format!("unexpected consume reply: {other}"))
                })?;
                serde_json::from_str(body).map_err(infra)
            }
        }
    }

    fn not_found(&self) -> ApplicationError {
        ApplicationError::not_found(format!("{} not found", self.label))
    }

    fn expired(&self) -> ApplicationError {
        ApplicationError::expired(format!("{} has expired", self.label))
    }

    fn already_consumed(&self) -> ApplicationError {
        ApplicationError::already_consumed(format!("{} was already used", self.label))
    }
}

#[derive(Clone)]
pub struct RedisTicketStore {
    inner: RedisOneShot,
}

impl RedisTicketStore {
    pub fn new(pool: Pool) -> Self {
        Self {
            inner: RedisOneShot::new(pool, "ticket", "ticket"),
        }
    }
}

#[async_trait]
impl TicketStore for RedisTicketStore {
    async fn insert(
        &self,
        ticket: AuthorizationTicket,
        now: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        self.inner.insert(ticket.id.as_str(), &ticket, now).await
    }

    async fn resolve(
        &self,
        id: &TicketId,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationTicket> {
        self.inner.resolve(id.as_str(), now).await
    }

    async fn consume(
        &self,
        id: &TicketId,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationTicket> {
        self.inner.consume(id.as_str(), now).await
    }

    async fn purge_expired(&self, _cutoff: DateTime<Utc>) -> ApplicationResult<usize> {
        // Key TTLs evict expired entries.
        Ok(0)
    }
}

#[derive(Clone)]
pub struct RedisAuthorizationCodeStore {
    inner: RedisOneShot,
}

impl RedisAuthorizationCodeStore {
    pub fn new(pool: Pool) -> Self {
        Self {
            inner: RedisOneShot::new(pool, "code", "authorization code"),
        }
    }
}

#[async_trait]
impl AuthorizationCodeStore for RedisAuthorizationCodeStore {
    async fn insert(&self, code: AuthorizationCode, now: DateTime<Utc>) -> ApplicationResult<()> {
        self.inner.insert(&code.fingerprint, &code, now).await
    }

    async fn consume(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationCode> {
        self.inner.consume(fingerprint, now).await
    }

    async fn purge_expired(&self, _cutoff: DateTime<Utc>) -> ApplicationResult<usize> {
        Ok(0)
    }
}

#[derive(Clone)]
pub struct RedisTokenStore {
    refresh: RedisOneShot,
    pool: Pool,
}

impl RedisTokenStore {
    pub fn new(pool: Pool) -> Self {
        Self {
            refresh: RedisOneShot::new(pool.clone(), "refresh", "refresh token"),
            pool,
        }
    }

    fn revoked_key(grant_id: &GrantId) -> String {
        format!("{KEY_PREFIX}:grant:revoked:{grant_id}")
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn insert_refresh(
        &self,
        record: RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        self.refresh.insert(&record.fingerprint, &record, now).await
    }

    async fn find_active_refresh(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<Option<RefreshTokenRecord>> {
        Ok(match self.refresh.peek::<RefreshTokenRecord>(fingerprint).await? {
            Peek::Pending(record) if !record.is_expired_at(now) => Some(record),
            _ => None,
        })
    }

    async fn grant_of_refresh(&self, fingerprint: &str) -> ApplicationResult<Option<GrantId>> {
        Ok(match self.refresh.peek::<RefreshTokenRecord>(fingerprint).await? {
            Peek::Pending(record) | Peek::Consumed(record) => Some(record.grant_id),
            Peek::Missing => None,
        })
    }

    async fn consume_refresh(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<RefreshTokenRecord> {
        self.refresh.consume(fingerprint, now).await
    }

    async fn revoke_grant(
        &self,
        grant_id: &GrantId,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        let ttl = (until - now).num_seconds().max(1);
        let mut conn = self.pool.get().await.map_err(infra)?;
        let _: () = redis::cmd("SET")
            .arg(Self::revoked_key(grant_id))
            .arg(1)
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await
            .map_err(infra)?;
        Ok(())
    }

    async fn is_grant_revoked(&self, grant_id: &GrantId) -> ApplicationResult<bool> {
        let mut conn = self.pool.get().await.map_err(infra)?;
        let exists: bool = conn
            .exists(Self::revoked_key(grant_id))
            .await
            .map_err(infra)?;
        Ok(exists)
    }

    async fn purge_expired(&self, _cutoff: DateTime<Utc>) -> ApplicationResult<usize> {
        Ok(0)
    }
}
