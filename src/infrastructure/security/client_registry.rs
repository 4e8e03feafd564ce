use crate::application::{
    ApplicationResult, ports::client_registry::ClientRegistry, ports::security::SecretHasher,
};
use crate::config::ClientSeed;
use crate::domain::oauth::{Client, ClientId, RedirectUri, ScopeSet};
use async_trait::async_trait;
use std::collections::HashMap;

/// Static client registry loaded once at start-up.
#[derive(Default)]
pub struct InMemoryClientRegistry {
    clients: HashMap<ClientId, Client>,
}

impl InMemoryClientRegistry {
    pub fn new(clients: impl IntoIterator<Item = Client>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|client| (client.id.clone(), client))
                .collect(),
        }
    }

    /// Build the registry from configuration. Secrets that are not already Argon2 PHC
    /// strings are hashed here so plaintext never stays in memory past start-up.
    pub async fn from_seeds(
        seeds: &[ClientSeed],
        hasher: &dyn SecretHasher,
    ) -> ApplicationResult<Self> {
        let mut clients = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let secret_hash = if seed.secret.starts_with("$argon2") {
                seed.secret.clone()
            } else {
                hasher.hash(&seed.secret).await?
            };

            let redirect_uris = seed
                .redirect_uris
                .iter()
                .map(RedirectUri::new)
                .collect::<Result<Vec<_>, _>>()?;

            clients.push(Client {
                id: ClientId::new(seed.client_id.clone())?,
                secret_hash,
                redirect_uris,
                allowed_scope: ScopeSet::parse(&seed.scope)?,
            });
        }
        Ok(Self::new(clients))
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl ClientRegistry for InMemoryClientRegistry {
    async fn find(&self, client_id: &ClientId) -> ApplicationResult<Option<Client>> {
        Ok(self.clients.get(client_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;

    struct PrefixHasher;

    #[async_trait]
    impl SecretHasher for PrefixHasher {
        async fn hash(&self, secret: &str) -> ApplicationResult<String> {
            Ok(format!("hashed:{secret}"))
        }

        async fn verify(&self, _secret: &str, _expected_hash: &str) -> ApplicationResult<()> {
            Err(ApplicationError::invalid_client("unused"))
        }
    }

    fn seed(secret: &str) -> ClientSeed {
        ClientSeed {
            client_id: "mobile".into(),
            secret: secret.into(),
            redirect_uris: vec!["http://localhost:3000/callback".into()],
            scope: "openid profile".into(),
        }
    }

    #[tokio::test]
    async fn plaintext_secrets_are_hashed_and_phc_strings_kept() {
        let registry = InMemoryClientRegistry::from_seeds(&[seed("s3cret")], &PrefixHasher)
            .await
            .unwrap();
        let client = registry
            .find(&ClientId::new("mobile").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(client.secret_hash, "hashed:s3cret");
        assert_eq!(client.allowed_scope.to_string(), "openid profile");

        let phc = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";
        let registry = InMemoryClientRegistry::from_seeds(&[seed(phc)], &PrefixHasher)
            .await
            .unwrap();
        let client = registry
            .find(&ClientId::new("mobile").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(client.secret_hash, phc);
    }

    #[tokio::test]
    async fn invalid_redirect_uri_fails_loading() {
        let mut bad = seed("s3cret");
        bad.redirect_uris = vec!["/relative".into()];
        assert!(
            InMemoryClientRegistry::from_seeds(&[bad], &PrefixHasher)
                .await
                .is_err()
        );
    }
}
