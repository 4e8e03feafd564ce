// tests/support/mocks/security.rs
use authgate::application::{
    ApplicationResult, error::ApplicationError, ports::security::SecretHasher,
};
use authgate::domain::oauth::{Client, ClientId, RedirectUri, ScopeSet};

pub const TEST_BISCUIT_KEY: &str =
    "4ff6e5d7b6a3f0a1c2d3e4f50617283940a1b2c3d4e5f60718293a4b5c6d7e8f";
pub const TEST_ISSUER: &str = "http://localhost:8888";
pub const INTROSPECTION_KEY: &str = "resource-server-key";

pub const CLIENT_ID: &str = "mobile";
pub const CLIENT_SECRET: &str = "mobile-secret";
pub const REDIRECT_URI: &str = "http://localhost:3000/callback";
pub const CLIENT_SCOPE: &str = "openid profile email";

pub const OTHER_CLIENT_ID: &str = "web";
pub const OTHER_CLIENT_SECRET: &str = "web-secret";
pub const OTHER_REDIRECT_URI: &str = "https://web.example/cb";

/// Stores secrets as `plain:<secret>` so tests skip Argon2's cost.
#[derive(Default, Clone)]
pub struct PlainSecretHasher;

#[async_trait::async_trait]
impl SecretHasher for PlainSecretHasher {
    async fn hash(&self, secret: &str) -> ApplicationResult<String> {
        Ok(format!("plain:{secret}"))
    }

    async fn verify(&self, secret: &str, expected_hash: &str) -> ApplicationResult<()> {
        if expected_hash == format!("plain:{secret}") {
            Ok(())
        } else {
            Err(ApplicationError::invalid_client("client authentication failed"))
        }
    }
}

pub fn test_clients() -> Vec<Client> {
    vec![
        Client {
            id: ClientId::new(CLIENT_ID).unwrap(),
            secret_hash: format!("plain:{CLIENT_SECRET}"),
            redirect_uris: vec![RedirectUri::new(REDIRECT_URI).unwrap()],
            allowed_scope: ScopeSet::parse(CLIENT_SCOPE).unwrap(),
        },
        Client {
            id: ClientId::new(OTHER_CLIENT_ID).unwrap(),
            secret_hash: format!("plain:{OTHER_CLIENT_SECRET}"),
            redirect_uris: vec![RedirectUri::new(OTHER_REDIRECT_URI).unwrap()],
            allowed_scope: ScopeSet::parse("openid").unwrap(),
        },
    ]
}
