use std::sync::Arc;

use crate::{
    application::{
        dto::IntrospectionDto,
        error::ApplicationResult,
        ports::{security::AccessTokenIssuer, time::Clock, token_store::TokenStore},
    },
    domain::oauth::{
        AccessTokenClaims, ClientId, Expiring, GrantId, RefreshTokenRecord, ScopeSet, Subject,
        TokenKind, fingerprint,
    },
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct IntrospectionQuery {
    pub token: String,
    /// When present, the token is only reported active if it carries all of these scopes.
    pub scope: Option<String>,
}

struct ActiveToken {
    kind: TokenKind,
    grant_id: GrantId,
    client_id: ClientId,
    subject: Subject,
    scope: ScopeSet,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<AccessTokenClaims> for ActiveToken {
    fn from(claims: AccessTokenClaims) -> Self {
        Self {
            kind: TokenKind::Access,
            grant_id: claims.grant_id,
            client_id: claims.client_id,
            subject: claims.subject,
            scope: claims.scope,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        }
    }
}

impl From<RefreshTokenRecord> for ActiveToken {
    fn from(record: RefreshTokenRecord) -> Self {
        Self {
            kind: TokenKind::Refresh,
            grant_id: record.grant_id,
            client_id: record.client_id,
            subject: record.subject,
            scope: record.scope,
            issued_at: record.issued_at,
            expires_at: record.expires_at,
        }
    }
}

impl From<ActiveToken> for IntrospectionDto {
    fn from(token: ActiveToken) -> Self {
        Self {
            active: true,
            scope: Some(token.scope.to_string()),
            client_id: Some(token.client_id.to_string()),
            sub: Some(token.subject.to_string()),
            exp: Some(token.expires_at.timestamp()),
            iat: Some(token.issued_at.timestamp()),
            token_type: Some(token.kind.as_str().to_string()),
        }
    }
}

pub struct IntrospectionService {
    access_tokens: Arc<dyn AccessTokenIssuer>,
    tokens: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl IntrospectionService {
    pub fn new(
        access_tokens: Arc<dyn AccessTokenIssuer>,
        tokens: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access_tokens,
            tokens,
            clock,
        }
    }

    /// Report whether `token` is currently usable. Only store failures are errors; every
    /// other reason a token is unusable yields `active: false`.
    pub async fn introspect(&self, query: IntrospectionQuery) -> ApplicationResult<IntrospectionDto> {
        if query.token.is_empty() {
            return Ok(IntrospectionDto::inactive());
        }

        let required = match query.scope.as_deref() {
            Some(raw) => match ScopeSet::parse(raw) {
                Ok(scope) => scope,
                Err(_) => return Ok(IntrospectionDto::inactive()),
            },
            None => ScopeSet::default(),
        };

        let now = self.clock.now();
        let candidate = match self.access_tokens.verify(&query.token).await {
            Ok(claims) if claims.is_expired_at(now) => None,
            Ok(claims) => Some(ActiveToken::from(claims)),
            Err(_) => self
                .tokens
                .find_active_refresh(&fingerprint(&query.token), now)
                .await?
                .map(ActiveToken::from),
        };

        let Some(token) = candidate else {
            return Ok(IntrospectionDto::inactive());
        };

        if self.tokens.is_grant_revoked(&token.grant_id).await?
            || !required.is_subset_of(&token.scope)
        {
            return Ok(IntrospectionDto::inactive());
        }

        Ok(token.into())
    }
}
