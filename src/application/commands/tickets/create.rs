use super::TicketCommandService;
use crate::{
    application::{
        dto::IssuedTicket,
        error::{ApplicationError, ApplicationResult},
    },
    domain::oauth::{
        AuthorizationRequest, AuthorizationTicket, Client, ClientId, CodeChallengeMethod,
        PkceChallenge, RedirectUri, ResponseType, ScopeSet, TicketId,
    },
};

/// Raw authorization request fields as received at the authorization endpoint.
#[derive(Debug, Clone, Default)]
pub struct CreateTicketCommand {
    pub client_id: String,
    pub response_type: String,
    pub redirect_uri: String,
    pub scope: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

impl TicketCommandService {
    pub async fn create(&self, command: CreateTicketCommand) -> ApplicationResult<IssuedTicket> {
        let request = self.validate_request(command).await?;

        let now = self.clock.now();
        let ticket = AuthorizationTicket {
            id: TicketId::new(self.generator.generate()?)?,
            request,
            created_at: now,
            expires_at: now + self.policy.ttl,
        };

        let issued = IssuedTicket {
            ticket: ticket.id.clone(),
            expires_at: ticket.expires_at,
        };

        tracing::info!(
            client_id = %ticket.request.client_id,
            scope = %ticket.request.scope,
            pkce_method = %ticket.request.pkce.method(),
            "authorization ticket issued"
        );
        self.store.insert(ticket, now).await?;

        Ok(issued)
    }

    async fn validate_request(
        &self,
        command: CreateTicketCommand,
    ) -> ApplicationResult<AuthorizationRequest> {
        let client_id = ClientId::new(command.client_id)?;
        let client = self
            .clients
            .find(&client_id)
            .await?
            .ok_or_else(|| ApplicationError::validation("unknown client_id"))?;

        let redirect_uri = RedirectUri::new(command.redirect_uri)?;
        if !client.has_redirect_uri(&redirect_uri) {
            return Err(ApplicationError::validation(
                "redirect_uri is not registered for this client",
            ));
        }

        let response_type: ResponseType = command.response_type.parse()?;
        let scope = Self::resolve_scope(&client, command.scope.as_deref())?;
        let pkce = self.build_pkce(command.code_challenge, command.code_challenge_method)?;

        Ok(AuthorizationRequest {
            client_id,
            response_type,
            redirect_uri,
            scope,
            state: command.state.filter(|state| !state.is_empty()),
            pkce,
        })
    }

    fn resolve_scope(client: &Client, requested: Option<&str>) -> ApplicationResult<ScopeSet> {
        let requested = match requested {
            Some(raw) => ScopeSet::parse(raw)?,
            None => ScopeSet::default(),
        };

        if requested.is_empty() {
            return Ok(client.allowed_scope.clone());
        }

        if !client.permits_scope(&requested) {
            return Err(ApplicationError::invalid_scope(
                "requested scope exceeds what the client may request",
            ));
        }

        Ok(requested)
    }

    fn build_pkce(
        &self,
        challenge: Option<String>,
        method: Option<String>,
    ) -> ApplicationResult<PkceChallenge> {
        let challenge = challenge
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApplicationError::validation("code_challenge is required"))?;

        // RFC 7636 §4.3: an absent method means "plain".
        let method = match method.as_deref() {
            None | Some("") => CodeChallengeMethod::Plain,
            Some(raw) => raw.parse()?,
        };

        if method == CodeChallengeMethod::Plain && !self.policy.allow_plain_pkce {
            return Err(ApplicationError::validation(
                "code_challenge_method 'plain' is not allowed",
            ));
        }

        Ok(PkceChallenge::new(challenge, method)?)
    }
}
