// src/infrastructure/security/token.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::AccessTokenIssuer,
};
use crate::domain::oauth::AccessTokenClaims;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use biscuit_auth::{
    Biscuit, KeyPair, PrivateKey, PublicKey,
    builder::{Algorithm, AuthorizerBuilder, Term},
};
use serde_json::json;
use std::{collections::HashMap, sync::Arc, time::SystemTime};

/// Access tokens are Ed25519-signed biscuits carrying the grant's facts. Expiry is sealed
/// into the token but enforced by the caller against its own clock.
#[derive(Clone)]
pub struct BiscuitAccessTokenIssuer {
    root: Arc<KeyPair>,
    public: PublicKey,
    issuer: String,
}

impl BiscuitAccessTokenIssuer {
    pub fn new(private_key_hex: &str, issuer: impl Into<String>) -> ApplicationResult<Self> {
        let private = PrivateKey::from_bytes_hex(private_key_hex, Algorithm::Ed25519)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let keypair = KeyPair::from(&private);
        let public = keypair.public();

        Ok(Self {
            root: Arc::new(keypair),
            public,
            issuer: issuer.into(),
        })
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn build_code_and_params(
    claims: &AccessTokenClaims,
    issuer: &str,
) -> (String, HashMap<String, Term>) {
    let mut params: HashMap<String, Term> = HashMap::new();
    params.insert("jti".to_string(), claims.token_id.clone().into());
    params.insert("iss".to_string(), issuer.to_string().into());
    params.insert("gid".to_string(), claims.grant_id.as_str().to_string().into());
    params.insert("cid".to_string(), claims.client_id.as_str().to_string().into());
    params.insert("sub".to_string(), claims.subject.as_str().to_string().into());
    params.insert("issued".to_string(), SystemTime::from(claims.issued_at).into());
    params.insert("exp".to_string(), SystemTime::from(claims.expires_at).into());

    let mut code = String::from(
        r#"
                token_id({jti});
                issuer({iss});
                grant({gid});
                client({cid});
                subject({sub});
                issued_at({issued});
                expires_at({exp});
                token_type("access");
                check if token_type("access");
                "#,
    );

    for scope in claims.scope.iter() {
        code.push_str(&format!("scope(\"{}\");\n", escape_literal(scope)));
    }

    (code, params)
}

fn build_and_serialize_biscuit(
    code: &str,
    params: HashMap<String, Term>,
    root: &KeyPair,
) -> ApplicationResult<String> {
    let token = Biscuit::builder()
        .code_with_params(code, params, HashMap::new())
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
        .build(root)
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

    token
        .seal()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
        .to_base64()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

#[async_trait]
impl AccessTokenIssuer for BiscuitAccessTokenIssuer {
    async fn issue(&self, claims: &AccessTokenClaims) -> ApplicationResult<String> {
        let (code, params) = build_code_and_params(claims, &self.issuer);
        build_and_serialize_biscuit(&code, params, self.root.as_ref())
    }

    async fn verify(&self, token: &str) -> ApplicationResult<AccessTokenClaims> {
        let biscuit = Biscuit::from_base64(token, self.public)
            .map_err(|err| ApplicationError::invalid_grant(err.to_string()))?;

        let mut authorizer = AuthorizerBuilder::new()
            .code(r#"allow if token_type("access");"#)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
            .build(&biscuit)
            .map_err(|err| ApplicationError::invalid_grant(err.to_string()))?;

        authorizer
            .authorize()
            .map_err(|err| ApplicationError::invalid_grant(err.to_string()))?;

        let (facts, _, _, _) = authorizer.dump();
        crate::infrastructure::security::claims::parse_claims(facts, &self.issuer)
    }

    async fn public_jwk(&self) -> ApplicationResult<serde_json::Value> {
        // Ed25519 (OKP) key with the raw public key as `x`.
        let x = URL_SAFE_NO_PAD.encode(self.public.to_bytes());

        Ok(json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "alg": "EdDSA",
            "use": "sig",
            "x": x,
            "kid": self.public.to_bytes_hex(),
        }))
    }
}
