use super::{TokenExchanger, mint::MintRequest};
use crate::{
    application::{
        dto::TokenPairDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        errors::DomainError,
        oauth::{GrantId, GrantType, TokenParent, fingerprint},
    },
};

const INVALID_CODE: &str = "authorization code is invalid";

#[derive(Debug, Clone, Default)]
pub struct ExchangeCodeCommand {
    pub grant_type: String,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_verifier: Option<String>,
    pub client_id: String,
    pub client_secret: Option<String>,
    /// Accepted for compatibility with clients that echo it; not checked.
    pub state: Option<String>,
}

fn required(value: Option<String>, name: &str) -> ApplicationResult<String> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApplicationError::validation(format!("{name} is required")))
}

impl TokenExchanger {
    pub async fn exchange(&self, command: ExchangeCodeCommand) -> ApplicationResult<TokenPairDto> {
        let grant_type: GrantType = command.grant_type.parse()?;
        if grant_type != GrantType::AuthorizationCode {
            return Err(DomainError::UnsupportedGrantType(grant_type.to_string()).into());
        }

        let code = required(command.code, "code")?;
        let redirect_uri = required(command.redirect_uri, "redirect_uri")?;
        let verifier = required(command.code_verifier, "code_verifier")?;

        // A failed client authentication must leave the code redeemable.
        let client = self
            .clients
            .authenticate(&command.client_id, command.client_secret.as_deref())
            .await?;

        let code_fingerprint = fingerprint(&code);
        let now = self.clock.now();
        let record = match self.codes.consume(&code_fingerprint, now).await {
            Ok(record) => record,
            Err(ApplicationError::AlreadyConsumed(_)) => {
                let grant_id = GrantId::for_code_fingerprint(&code_fingerprint);
                self.revoke_family(&grant_id, now).await?;
                tracing::warn!(
                    client_id = %client.id,
                    grant_id = %grant_id,
                    "authorization code replayed; grant revoked"
                );
                return Err(ApplicationError::invalid_grant(INVALID_CODE));
            }
            Err(err) if err.is_redemption_failure() => {
                tracing::debug!(client_id = %client.id, error = %err, "code redemption failed");
                return Err(ApplicationError::invalid_grant(INVALID_CODE));
            }
            Err(err) => return Err(err),
        };

        if record.client_id != client.id {
            tracing::warn!(
                client_id = %client.id,
                code_client_id = %record.client_id,
                "authorization code presented by another client"
            );
            return Err(ApplicationError::invalid_grant(INVALID_CODE));
        }

        if record.redirect_uri.as_str() != redirect_uri || !record.pkce.verify(&verifier) {
            return Err(ApplicationError::mismatch(INVALID_CODE));
        }

        let grant_id = record.grant_id();
        let pair = self
            .mint_pair(MintRequest {
                grant_id: grant_id.clone(),
                client_id: record.client_id,
                subject: record.subject,
                grant_scope: record.scope.clone(),
                access_scope: record.scope,
                parent: TokenParent::Code(code_fingerprint),
                now,
            })
            .await?;

        tracing::info!(client_id = %client.id, grant_id = %grant_id, "authorization code exchanged");
        Ok(pair)
    }
}
