use std::sync::Arc;

use crate::{
    application::{
        commands::clients::ClientAuthenticator,
        error::ApplicationResult,
        ports::{
            authorization_code::AuthorizationCodeStore,
            security::{AccessTokenIssuer, SecretGenerator},
            time::Clock,
            token_store::TokenStore,
        },
    },
    domain::oauth::GrantId,
};
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy)]
pub struct TokenPolicy {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// Redeems authorization codes and refresh tokens for token pairs.
pub struct TokenExchanger {
    pub(super) codes: Arc<dyn AuthorizationCodeStore>,
    pub(super) tokens: Arc<dyn TokenStore>,
    pub(super) clients: Arc<ClientAuthenticator>,
    pub(super) access_tokens: Arc<dyn AccessTokenIssuer>,
    pub(super) generator: Arc<dyn SecretGenerator>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) policy: TokenPolicy,
}

impl TokenExchanger {
    pub fn new(
        codes: Arc<dyn AuthorizationCodeStore>,
        tokens: Arc<dyn TokenStore>,
        clients: Arc<ClientAuthenticator>,
        access_tokens: Arc<dyn AccessTokenIssuer>,
        generator: Arc<dyn SecretGenerator>,
        clock: Arc<dyn Clock>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            codes,
            tokens,
            clients,
            access_tokens,
            generator,
            clock,
            policy,
        }
    }

    /// Revoke every token of the grant. The marker outlives the longest token the grant
    /// can still have, access or refresh.
    pub(super) async fn revoke_family(
        &self,
        grant_id: &GrantId,
        now: DateTime<Utc>,
    ) -> ApplicationResult<()> {
        let until = now + self.policy.access_ttl.max(self.policy.refresh_ttl);
        self.tokens.revoke_grant(grant_id, now, until).await
    }
}
