use std::sync::Arc;

use crate::{
    application::{
        dto::PendingAuthorizationDto,
        error::ApplicationResult,
        ports::{ticket_store::TicketStore, time::Clock},
    },
    domain::oauth::TicketId,
};

/// Read side of the ticket store, used to render the consent screen.
pub struct TicketQueryService {
    store: Arc<dyn TicketStore>,
    clock: Arc<dyn Clock>,
}

impl TicketQueryService {
    pub fn new(store: Arc<dyn TicketStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn pending(&self, ticket: &str) -> ApplicationResult<PendingAuthorizationDto> {
        let id = TicketId::new(ticket)?;
        let ticket = self.store.resolve(&id, self.clock.now()).await?;
        Ok(ticket.into())
    }
}
