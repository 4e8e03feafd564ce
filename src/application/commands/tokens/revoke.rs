use super::TokenExchanger;
use crate::{
    application::error::ApplicationResult,
    domain::oauth::{Client, GrantId, TokenKind, fingerprint},
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct RevokeTokenCommand {
    pub token: String,
    pub token_type_hint: Option<String>,
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl TokenExchanger {
    /// RFC 7009 revocation. Unknown tokens and tokens of other clients are ignored.
    pub async fn revoke(&self, command: RevokeTokenCommand) -> ApplicationResult<()> {
        let client = self
            .clients
            .authenticate(&command.client_id, command.client_secret.as_deref())
            .await?;

        let now = self.clock.now();
        let hint = match command.token_type_hint.as_deref() {
            Some("access_token") => Some(TokenKind::Access),
            Some("refresh_token") => Some(TokenKind::Refresh),
            _ => None,
        };

        if let Some(grant_id) = self.grant_owned_by(&client, &command.token, hint, now).await? {
            self.revoke_family(&grant_id, now).await?;
            tracing::info!(client_id = %client.id, grant_id = %grant_id, "grant revoked");
        }

        Ok(())
    }

    async fn grant_owned_by(
        &self,
        client: &Client,
        token: &str,
        hint: Option<TokenKind>,
        now: DateTime<Utc>,
    ) -> ApplicationResult<Option<GrantId>> {
        if token.is_empty() {
            return Ok(None);
        }

        let order = match hint {
            Some(TokenKind::Access) => [TokenKind::Access, TokenKind::Refresh],
            _ => [TokenKind::Refresh, TokenKind::Access],
        };

        for kind in order {
            let found = match kind {
                TokenKind::Refresh => self
                    .tokens
                    .find_active_refresh(&fingerprint(token), now)
                    .await?
                    .map(|record| (record.client_id, record.grant_id)),
                TokenKind::Access => self
                    .access_tokens
                    .verify(token)
                    .await
                    .ok()
                    .map(|claims| (claims.client_id, claims.grant_id)),
            };

            if let Some((owner, grant_id)) = found {
                return Ok((owner == client.id).then_some(grant_id));
            }
        }

        Ok(None)
    }
}
