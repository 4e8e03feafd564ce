use super::CodeIssuer;
use crate::{
    application::error::ApplicationResult,
    domain::oauth::{
        AuthorizationCode, ClientId, PkceChallenge, RedirectUri, ScopeSet, Subject, fingerprint,
    },
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct IssueCodeCommand {
    pub client_id: ClientId,
    pub redirect_uri: RedirectUri,
    pub scope: ScopeSet,
    pub subject: Subject,
    pub pkce: PkceChallenge,
}

/// The raw code is handed to the client exactly once; only its fingerprint is stored.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl CodeIssuer {
    pub async fn issue(&self, command: IssueCodeCommand) -> ApplicationResult<IssuedCode> {
        let code = self.generator.generate()?;
        let now = self.clock.now();
        let record = AuthorizationCode {
            fingerprint: fingerprint(&code),
            client_id: command.client_id,
            redirect_uri: command.redirect_uri,
            scope: command.scope,
            subject: command.subject,
            pkce: command.pkce,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        let expires_at = record.expires_at;

        tracing::debug!(
            client_id = %record.client_id,
            grant_id = %record.grant_id(),
            "authorization code issued"
        );
        self.store.insert(record, now).await?;

        Ok(IssuedCode { code, expires_at })
    }
}
