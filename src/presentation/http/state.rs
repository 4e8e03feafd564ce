// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    /// Public base URL advertised in discovery, without a trailing slash.
    pub issuer: Arc<str>,
    /// Bearer key resource servers present at `/introspect`. `None` disables the endpoint.
    pub introspection_key: Option<Arc<str>>,
    pub allow_plain_pkce: bool,
}
