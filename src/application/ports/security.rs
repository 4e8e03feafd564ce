// src/application/ports/security.rs
use crate::application::ApplicationResult;
use crate::domain::oauth::AccessTokenClaims;
use async_trait::async_trait;

#[async_trait]
pub trait SecretHasher: Send + Sync {
    async fn hash(&self, secret: &str) -> ApplicationResult<String>;
    /// Fails with `InvalidClient` when the secret does not match.
    async fn verify(&self, secret: &str, expected_hash: &str) -> ApplicationResult<()>;
}

#[async_trait]
pub trait AccessTokenIssuer: Send + Sync {
    async fn issue(&self, claims: &AccessTokenClaims) -> ApplicationResult<String>;
    /// Check the signature and decode the sealed claims. Expiry and revocation are the
    /// caller's concern.
    async fn verify(&self, token: &str) -> ApplicationResult<AccessTokenClaims>;
    /// Return a JSON Web Key Set with the public key that verifies issued tokens.
    async fn public_jwk(&self) -> ApplicationResult<serde_json::Value>;
}

pub trait SecretGenerator: Send + Sync {
    /// Opaque, URL-safe random value (ticket ids, codes, refresh tokens).
    fn generate(&self) -> ApplicationResult<String>;
}
