use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::SecretHasher,
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use async_trait::async_trait;

/// Argon2id with default parameters; client secrets are stored as PHC strings.
#[derive(Default, Clone)]
pub struct Argon2SecretHasher;

#[async_trait]
impl SecretHasher for Argon2SecretHasher {
    async fn hash(&self, secret: &str) -> ApplicationResult<String> {
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(secret.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))
        })
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
    }

    async fn verify(&self, secret: &str, expected_hash: &str) -> ApplicationResult<()> {
        let secret = secret.to_owned();
        let expected_hash = expected_hash.to_owned();
        tokio::task::spawn_blocking(move || -> Result<(), ApplicationError> {
            let parsed = PasswordHash::new(&expected_hash)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
            Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .map_err(|_| ApplicationError::invalid_client("client authentication failed"))
        })
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = Argon2SecretHasher;
        let hash = hasher.hash("s3cret").await.unwrap();
        assert!(hash.starts_with("$argon2"));
        hasher.verify("s3cret", &hash).await.unwrap();
        assert!(matches!(
            hasher.verify("other", &hash).await,
            Err(ApplicationError::InvalidClient(_))
        ));
    }
}
