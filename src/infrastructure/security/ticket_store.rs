// src/infrastructure/security/ticket_store.rs
use super::one_shot::OneShotMap;
use crate::application::ApplicationResult;
use crate::application::ports::ticket_store::TicketStore;
use crate::domain::oauth::{AuthorizationTicket, TicketId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub struct InMemoryTicketStore {
    tickets: OneShotMap<AuthorizationTicket>,
}

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self {
            tickets: OneShotMap::new("ticket"),
        }
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn insert(
        &self,
        ticket: AuthorizationTicket,
        _now: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        self.tickets.insert(ticket.id.as_str().to_string(), ticket)
    }

    async fn resolve(
        &self,
        id: &TicketId,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationTicket> {
        self.tickets.resolve(id.as_str(), now)
    }

    async fn consume(
        &self,
        id: &TicketId,
        now: DateTime<Utc>,
    ) -> ApplicationResult<AuthorizationTicket> {
        self.tickets.consume(id.as_str(), now)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> ApplicationResult<usize> {
        self.tickets.purge_expired(cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::domain::oauth::{
        AuthorizationRequest, ClientId, CodeChallengeMethod, PkceChallenge, RedirectUri,
        ResponseType, ScopeSet,
    };
    use chrono::Duration;

    fn ticket(now: DateTime<Utc>) -> AuthorizationTicket {
        AuthorizationTicket {
            id: TicketId::new("t-1").unwrap(),
            request: AuthorizationRequest {
                client_id: ClientId::new("mobile").unwrap(),
                response_type: ResponseType::Code,
                redirect_uri: RedirectUri::new("http://localhost:3000/callback").unwrap(),
                scope: ScopeSet::parse("openid").unwrap(),
                state: Some("xyz".into()),
                pkce: PkceChallenge::new(
                    "dBjftJeZ4CVP-mJ0kq7vvcf4ejR7uVq7eNW5K-2YkXw",
                    CodeChallengeMethod::Plain,
                )
                .unwrap(),
            },
            created_at: now,
            expires_at: now + Duration::minutes(10),
        }
    }

    #[tokio::test]
    async fn resolve_returns_what_was_stored() {
        let now = Utc::now();
        let store = InMemoryTicketStore::new();
        store.insert(ticket(now), now).await.unwrap();

        let id = TicketId::new("t-1").unwrap();
        assert_eq!(store.resolve(&id, now).await.unwrap(), ticket(now));
        assert_eq!(store.consume(&id, now).await.unwrap(), ticket(now));
        assert!(matches!(
            store.resolve(&id, now).await,
            Err(ApplicationError::AlreadyConsumed(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_ids_are_refused() {
        let now = Utc::now();
        let store = InMemoryTicketStore::new();
        store.insert(ticket(now), now).await.unwrap();
        assert!(store.insert(ticket(now), now).await.is_err());
    }
}
