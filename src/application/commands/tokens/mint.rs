use super::TokenExchanger;
use crate::{
    application::{dto::TokenPairDto, error::ApplicationResult},
    domain::oauth::{
        AccessTokenClaims, ClientId, GrantId, RefreshTokenRecord, ScopeSet, Subject, TokenParent,
        fingerprint,
    },
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub(super) struct MintRequest {
    pub grant_id: GrantId,
    pub client_id: ClientId,
    pub subject: Subject,
    /// Scope carried by the new refresh token.
    pub grant_scope: ScopeSet,
    /// Scope of the new access token; never wider than `grant_scope`.
    pub access_scope: ScopeSet,
    pub parent: TokenParent,
    pub now: DateTime<Utc>,
}

impl TokenExchanger {
    pub(super) async fn mint_pair(&self, request: MintRequest) -> ApplicationResult<TokenPairDto> {
        let claims = AccessTokenClaims {
            token_id: Uuid::new_v4().to_string(),
            grant_id: request.grant_id.clone(),
            client_id: request.client_id.clone(),
            subject: request.subject.clone(),
            scope: request.access_scope.clone(),
            issued_at: request.now,
            expires_at: request.now + self.policy.access_ttl,
        };
        let access_token = self.access_tokens.issue(&claims).await?;

        let refresh_token = self.generator.generate()?;
        let record = RefreshTokenRecord {
            fingerprint: fingerprint(&refresh_token),
            grant_id: request.grant_id,
            client_id: request.client_id,
            subject: request.subject,
            scope: request.grant_scope,
            parent: request.parent,
            issued_at: request.now,
            expires_at: request.now + self.policy.refresh_ttl,
        };
        self.tokens.insert_refresh(record, request.now).await?;

        Ok(TokenPairDto {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.policy.access_ttl.num_seconds(),
            scope: request.access_scope.to_string(),
        })
    }
}
