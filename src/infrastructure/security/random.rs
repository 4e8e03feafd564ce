use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::SecretGenerator,
};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

const SECRET_BYTES: usize = 32;

/// 256 bits from the operating system RNG, base64url encoded.
#[derive(Default, Clone)]
pub struct OsRngSecretGenerator;

impl SecretGenerator for OsRngSecretGenerator {
    fn generate(&self) -> ApplicationResult<String> {
        let mut bytes = [0_u8; SECRET_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}
