// src/application/services/mod.rs
use std::sync::Arc;

use crate::application::{
    ApplicationResult,
    commands::{
        clients::ClientAuthenticator,
        codes::CodeIssuer,
        consent::ConsentService,
        tickets::{TicketCommandService, TicketPolicy},
        tokens::{TokenExchanger, TokenPolicy},
    },
    ports::{
        authorization_code::AuthorizationCodeStore,
        client_registry::ClientRegistry,
        security::{AccessTokenIssuer, SecretGenerator, SecretHasher},
        ticket_store::TicketStore,
        time::Clock,
        token_store::TokenStore,
    },
    queries::{introspection::IntrospectionService, tickets::TicketQueryService},
};
use chrono::Duration;

mod sweeper;

pub use sweeper::{ExpirySweeper, SWEEP_GRACE_SECONDS, SweepReport};

/// Lifetimes and switches the services are built with.
#[derive(Debug, Clone, Copy)]
pub struct ServicePolicy {
    pub ticket_ttl: Duration,
    pub code_ttl: Duration,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub allow_plain_pkce: bool,
}

pub struct ApplicationServices {
    pub tickets: Arc<TicketCommandService>,
    pub ticket_queries: Arc<TicketQueryService>,
    pub consent: Arc<ConsentService>,
    pub codes: Arc<CodeIssuer>,
    pub tokens: Arc<TokenExchanger>,
    pub introspection: Arc<IntrospectionService>,
    access_tokens: Arc<dyn AccessTokenIssuer>,
    sweeper: Arc<ExpirySweeper>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticket_store: Arc<dyn TicketStore>,
        code_store: Arc<dyn AuthorizationCodeStore>,
        token_store: Arc<dyn TokenStore>,
        client_registry: Arc<dyn ClientRegistry>,
        secret_hasher: Arc<dyn SecretHasher>,
        access_tokens: Arc<dyn AccessTokenIssuer>,
        generator: Arc<dyn SecretGenerator>,
        clock: Arc<dyn Clock>,
        policy: ServicePolicy,
    ) -> Self {
        let tickets = Arc::new(TicketCommandService::new(
            Arc::clone(&ticket_store),
            Arc::clone(&client_registry),
            Arc::clone(&generator),
            Arc::clone(&clock),
            TicketPolicy {
                ttl: policy.ticket_ttl,
                allow_plain_pkce: policy.allow_plain_pkce,
            },
        ));
        let ticket_queries = Arc::new(TicketQueryService::new(
            Arc::clone(&ticket_store),
            Arc::clone(&clock),
        ));

        let codes = Arc::new(CodeIssuer::new(
            Arc::clone(&code_store),
            Arc::clone(&generator),
            Arc::clone(&clock),
            policy.code_ttl,
        ));
        let consent = Arc::new(ConsentService::new(Arc::clone(&tickets), Arc::clone(&codes)));

        let client_auth = Arc::new(ClientAuthenticator::new(
            Arc::clone(&client_registry),
            Arc::clone(&secret_hasher),
        ));
        let tokens = Arc::new(TokenExchanger::new(
            Arc::clone(&code_store),
            Arc::clone(&token_store),
            client_auth,
            Arc::clone(&access_tokens),
            Arc::clone(&generator),
            Arc::clone(&clock),
            TokenPolicy {
                access_ttl: policy.access_token_ttl,
                refresh_ttl: policy.refresh_token_ttl,
            },
        ));

        let introspection = Arc::new(IntrospectionService::new(
            Arc::clone(&access_tokens),
            Arc::clone(&token_store),
            Arc::clone(&clock),
        ));

        let sweeper = Arc::new(ExpirySweeper::new(
            ticket_store,
            code_store,
            token_store,
            clock,
        ));

        Self {
            tickets,
            ticket_queries,
            consent,
            codes,
            tokens,
            introspection,
            access_tokens,
            sweeper,
        }
    }

    pub fn sweeper(&self) -> Arc<ExpirySweeper> {
        Arc::clone(&self.sweeper)
    }

    /// JSON Web Key Set published for resource servers.
    pub async fn jwks(&self) -> ApplicationResult<serde_json::Value> {
        let key = self.access_tokens.public_jwk().await?;
        Ok(serde_json::json!({ "keys": [key] }))
    }
}
