use super::TicketCommandService;
use crate::{
    application::error::ApplicationResult,
    domain::oauth::{AuthorizationTicket, TicketId},
};

impl TicketCommandService {
    /// Take the ticket out of the pending state. Only one caller ever gets it back.
    pub async fn consume(&self, id: &TicketId) -> ApplicationResult<AuthorizationTicket> {
        let ticket = self.store.consume(id, self.clock.now()).await?;
        tracing::debug!(client_id = %ticket.request.client_id, "authorization ticket consumed");
        Ok(ticket)
    }
}
