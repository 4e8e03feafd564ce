// src/config.rs
use crate::application::services::ServicePolicy;
use std::{env, time::Duration};
use thiserror::Error;

const MAX_CODE_TTL_SECS: i64 = 60;
const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    issuer: String,
    biscuit_private_key: String,
    allowed_origins: Vec<String>,
    ticket_ttl_secs: i64,
    code_ttl_secs: i64,
    access_token_ttl_secs: i64,
    refresh_token_ttl_secs: i64,
    sweep_interval: Duration,
    allow_plain_pkce: bool,
    redis_url: Option<String>,
    introspection_api_key: Option<String>,
    rate_limit_enabled: bool,
    clients: Vec<ClientSeed>,
}

/// A client as declared in `OAUTH_CLIENTS`, before its secret is hashed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSeed {
    pub client_id: String,
    pub secret: String,
    pub redirect_uris: Vec<String>,
    pub scope: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8888".into()
}

fn default_issuer() -> String {
    "http://localhost:8888".into()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".into()]
}

fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seconds = |key: &'static str, default: i64| -> Result<i64, ConfigError> {
            match non_empty(lookup(key)) {
                None => Ok(default),
                Some(raw) => raw
                    .parse::<i64>()
                    .ok()
                    .filter(|secs| (1..=MAX_TTL_SECS).contains(secs))
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!(
                            "{key} must be an integer between 1 and {MAX_TTL_SECS}"
                        ))
                    }),
            }
        };
        let flag = |key: &str, default: bool| {
            non_empty(lookup(key)).map_or(default, |raw| parse_bool(&raw))
        };

        let listen_addr = non_empty(lookup("LISTEN_ADDR")).unwrap_or_else(default_listen_addr);
        let issuer = non_empty(lookup("OIDC_ISSUER"))
            .map(|issuer| issuer.trim_end_matches('/').to_string())
            .unwrap_or_else(default_issuer);

        let biscuit_private_key = non_empty(lookup("BISCUIT_ROOT_PRIVATE_KEY"))
            .ok_or(ConfigError::Missing("BISCUIT_ROOT_PRIVATE_KEY"))?;
        if biscuit_private_key.len() != 64
            || !biscuit_private_key.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ConfigError::Invalid(
                "BISCUIT_ROOT_PRIVATE_KEY must be a 32-byte hex string".into(),
            ));
        }

        let allowed_origins = non_empty(lookup("ALLOWED_ORIGINS"))
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(default_allowed_origins);

        let code_ttl_secs = seconds("CODE_TTL_SECONDS", MAX_CODE_TTL_SECS)?;
        if code_ttl_secs > MAX_CODE_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "CODE_TTL_SECONDS must be at most {MAX_CODE_TTL_SECS}"
            )));
        }

        let sweep_secs = seconds("SWEEP_INTERVAL_SECONDS", 60)?;

        let clients = match non_empty(lookup("OAUTH_CLIENTS")) {
            Some(raw) => parse_clients(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            listen_addr,
            issuer,
            biscuit_private_key,
            allowed_origins,
            ticket_ttl_secs: seconds("TICKET_TTL_SECONDS", 600)?,
            code_ttl_secs,
            access_token_ttl_secs: seconds("ACCESS_TOKEN_TTL_SECONDS", 3600)?,
            refresh_token_ttl_secs: seconds("REFRESH_TOKEN_TTL_SECONDS", 60 * 60 * 24 * 30)?,
            sweep_interval: Duration::from_secs(sweep_secs.unsigned_abs()),
            allow_plain_pkce: flag("PKCE_ALLOW_PLAIN", true),
            redis_url: non_empty(lookup("REDIS_URL")),
            introspection_api_key: non_empty(lookup("INTROSPECTION_API_KEY")),
            rate_limit_enabled: flag("RATE_LIMIT_ENABLED", true),
            clients,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn biscuit_private_key(&self) -> &str {
        &self.biscuit_private_key
    }

    /// Return the allowed CORS origins as configured.
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub const fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn introspection_api_key(&self) -> Option<&str> {
        self.introspection_api_key.as_deref()
    }

    pub const fn rate_limit_enabled(&self) -> bool {
        self.rate_limit_enabled
    }

    pub fn clients(&self) -> &[ClientSeed] {
        &self.clients
    }

    pub fn service_policy(&self) -> ServicePolicy {
        ServicePolicy {
            ticket_ttl: chrono::Duration::seconds(self.ticket_ttl_secs),
            code_ttl: chrono::Duration::seconds(self.code_ttl_secs),
            access_token_ttl: chrono::Duration::seconds(self.access_token_ttl_secs),
            refresh_token_ttl: chrono::Duration::seconds(self.refresh_token_ttl_secs),
            allow_plain_pkce: self.allow_plain_pkce,
        }
    }
}

/// Parse `id|secret|uri uri|scope scope` entries separated by `;`.
fn parse_clients(raw: &str) -> Result<Vec<ClientSeed>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.split('|').map(str::trim).collect();
            let [client_id, secret, uris, scope] = parts.as_slice() else {
                return Err(ConfigError::Invalid(format!(
                    "OAUTH_CLIENTS entry '{entry}' must have 4 '|'-separated fields"
                )));
            };
            if client_id.is_empty() || secret.is_empty() {
                return Err(ConfigError::Invalid(
                    "OAUTH_CLIENTS entries need a client id and a secret".into(),
                ));
            }
            let redirect_uris: Vec<String> =
                uris.split_whitespace().map(str::to_string).collect();
            if redirect_uris.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "client '{client_id}' has no redirect URI"
                )));
            }
            Ok(ClientSeed {
                client_id: (*client_id).to_string(),
                secret: (*secret).to_string(),
                redirect_uris,
                scope: (*scope).to_string(),
            })
        })
        .collect()
}
