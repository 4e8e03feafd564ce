use super::{TokenExchanger, mint::MintRequest};
use crate::{
    application::{
        dto::TokenPairDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::oauth::{ScopeSet, TokenParent, fingerprint},
};

const INVALID_REFRESH: &str = "refresh token is invalid";

#[derive(Debug, Clone, Default)]
pub struct RefreshTokenCommand {
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl TokenExchanger {
    /// Rotate a refresh token. Presenting an already rotated token revokes the whole grant.
    pub async fn refresh(&self, command: RefreshTokenCommand) -> ApplicationResult<TokenPairDto> {
        let presented = command
            .refresh_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApplicationError::validation("refresh_token is required"))?;

        let client = self
            .clients
            .authenticate(&command.client_id, command.client_secret.as_deref())
            .await?;

        let token_fingerprint = fingerprint(&presented);
        let now = self.clock.now();
        let record = match self.tokens.consume_refresh(&token_fingerprint, now).await {
            Ok(record) => record,
            Err(ApplicationError::AlreadyConsumed(_)) => {
                if let Some(grant_id) = self.tokens.grant_of_refresh(&token_fingerprint).await? {
                    self.revoke_family(&grant_id, now).await?;
                    tracing::warn!(
                        client_id = %client.id,
                        grant_id = %grant_id,
                        "refresh token reused; grant revoked"
                    );
                }
                return Err(ApplicationError::invalid_grant(INVALID_REFRESH));
            }
            Err(err) if err.is_redemption_failure() => {
                return Err(ApplicationError::invalid_grant(INVALID_REFRESH));
            }
            Err(err) => return Err(err),
        };

        if record.client_id != client.id || self.tokens.is_grant_revoked(&record.grant_id).await?
        {
            return Err(ApplicationError::invalid_grant(INVALID_REFRESH));
        }

        let access_scope = match command.scope.as_deref() {
            Some(raw) => {
                let requested = ScopeSet::parse(raw)?;
                if requested.is_empty() {
                    record.scope.clone()
                } else if requested.is_subset_of(&record.scope) {
                    requested
                } else {
                    return Err(ApplicationError::invalid_scope(
                        "requested scope exceeds the original grant",
                    ));
                }
            }
            None => record.scope.clone(),
        };

        tracing::info!(client_id = %client.id, grant_id = %record.grant_id, "refresh token rotated");
        self.mint_pair(MintRequest {
            grant_id: record.grant_id,
            client_id: record.client_id,
            subject: record.subject,
            grant_scope: record.scope,
            access_scope,
            parent: TokenParent::Refresh(token_fingerprint),
            now,
        })
        .await
    }
}
