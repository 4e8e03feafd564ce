use std::sync::Arc;

use crate::application::ports::{
    client_registry::ClientRegistry, security::SecretGenerator, ticket_store::TicketStore,
    time::Clock,
};
use chrono::Duration;

#[derive(Debug, Clone, Copy)]
pub struct TicketPolicy {
    pub ttl: Duration,
    pub allow_plain_pkce: bool,
}

pub struct TicketCommandService {
    pub(super) store: Arc<dyn TicketStore>,
    pub(super) clients: Arc<dyn ClientRegistry>,
    pub(super) generator: Arc<dyn SecretGenerator>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) policy: TicketPolicy,
}

impl TicketCommandService {
    pub fn new(
        store: Arc<dyn TicketStore>,
        clients: Arc<dyn ClientRegistry>,
        generator: Arc<dyn SecretGenerator>,
        clock: Arc<dyn Clock>,
        policy: TicketPolicy,
    ) -> Self {
        Self {
            store,
            clients,
            generator,
            clock,
            policy,
        }
    }
}
