use std::sync::Arc;

use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::{client_registry::ClientRegistry, security::SecretHasher},
    },
    domain::oauth::{Client, ClientId},
};

/// Confidential client authentication (`client_secret_post`).
pub struct ClientAuthenticator {
    registry: Arc<dyn ClientRegistry>,
    hasher: Arc<dyn SecretHasher>,
}

impl ClientAuthenticator {
    pub fn new(registry: Arc<dyn ClientRegistry>, hasher: Arc<dyn SecretHasher>) -> Self {
        Self { registry, hasher }
    }

    pub async fn authenticate(
        &self,
        client_id: &str,
        client_secret: Option<&str>,
    ) -> ApplicationResult<Client> {
        let id = ClientId::new(client_id)
            .map_err(|_| ApplicationError::invalid_client("client_id is required"))?;
        let secret = client_secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| ApplicationError::invalid_client("client_secret is required"))?;

        let client = self
            .registry
            .find(&id)
            .await?
            .ok_or_else(|| ApplicationError::invalid_client("client authentication failed"))?;

        self.hasher
            .verify(secret, &client.secret_hash)
            .await
            .map_err(|err| match err {
                ApplicationError::Infrastructure(_) => err,
                _ => ApplicationError::invalid_client("client authentication failed"),
            })?;

        Ok(client)
    }
}
