use super::ConsentService;
use crate::{
    application::{
        commands::codes::IssueCodeCommand, dto::ConsentOutcome, error::ApplicationResult,
    },
    domain::oauth::{Subject, TicketId},
};

#[derive(Debug, Clone)]
pub struct ConsentCommand {
    pub ticket: String,
    pub subject: String,
    pub approved: bool,
}

impl ConsentService {
    /// Resolve a pending ticket into a redirect. The ticket is consumed whichever way the
    /// subject decides, so a second decision on the same ticket fails.
    pub async fn decide(&self, command: ConsentCommand) -> ApplicationResult<ConsentOutcome> {
        let ticket_id = TicketId::new(command.ticket)?;
        let subject = Subject::new(command.subject)?;

        let request = self.tickets.consume(&ticket_id).await?.request;
        let state = request.state.as_deref();

        if !command.approved {
            let mut params = vec![("error", "access_denied")];
            if let Some(state) = state {
                params.push(("state", state));
            }
            tracing::info!(client_id = %request.client_id, "consent denied");
            return Ok(ConsentOutcome {
                redirect_to: request.redirect_uri.with_query(&params),
            });
        }

        let issued = self
            .codes
            .issue(IssueCodeCommand {
                client_id: request.client_id.clone(),
                redirect_uri: request.redirect_uri.clone(),
                scope: request.scope.clone(),
                subject,
                pkce: request.pkce.clone(),
            })
            .await?;

        let mut params = vec![("code", issued.code.as_str())];
        if let Some(state) = state {
            params.push(("state", state));
        }

        tracing::info!(client_id = %request.client_id, "consent granted");
        Ok(ConsentOutcome {
            redirect_to: request.redirect_uri.with_query(&params),
        })
    }
}
