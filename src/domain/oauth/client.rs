// src/domain/oauth/client.rs
use super::value_objects::{ClientId, RedirectUri, ScopeSet};

/// A registered confidential client.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    /// Argon2 PHC string.
    pub secret_hash: String,
    pub redirect_uris: Vec<RedirectUri>,
    pub allowed_scope: ScopeSet,
}

impl Client {
    pub fn has_redirect_uri(&self, uri: &RedirectUri) -> bool {
        self.redirect_uris.iter().any(|registered| registered == uri)
    }

    pub fn permits_scope(&self, requested: &ScopeSet) -> bool {
        requested.is_subset_of(&self.allowed_scope)
    }
}
