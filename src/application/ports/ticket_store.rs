// src/application/ports/ticket_store.rs
use crate::application::ApplicationResult;
use crate::domain::oauth::{AuthorizationTicket, TicketId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Store a new pending ticket. `now` is the issuing clock's time.
    async fn insert(&self, ticket: AuthorizationTicket, now: DateTime<Utc>)
    -> ApplicationResult<()>;

    /// Read a pending ticket without consuming it.
    async fn resolve(
        &self,
        id: &TicketId,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationTicket>;

    /// Atomically move the ticket from pending to consumed.
    ///
    /// Fails with `NotFound`, `Expired` or `AlreadyConsumed`; exactly one concurrent
    /// caller wins.
    async fn consume(
        &self,
        id: &TicketId,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationTicket>;

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> ApplicationResult<usize>;
}
