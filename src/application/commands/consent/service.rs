use std::sync::Arc;

use crate::application::commands::{codes::CodeIssuer, tickets::TicketCommandService};

pub struct ConsentService {
    pub(super) tickets: Arc<TicketCommandService>,
    pub(super) codes: Arc<CodeIssuer>,
}

impl ConsentService {
    pub fn new(tickets: Arc<TicketCommandService>, codes: Arc<CodeIssuer>) -> Self {
        Self { tickets, codes }
    }
}
