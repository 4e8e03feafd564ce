use std::sync::Arc;

use crate::application::ports::{
    authorization_code::AuthorizationCodeStore, security::SecretGenerator, time::Clock,
};
use chrono::Duration;

pub struct CodeIssuer {
    pub(super) store: Arc<dyn AuthorizationCodeStore>,
    pub(super) generator: Arc<dyn SecretGenerator>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) ttl: Duration,
}

impl CodeIssuer {
    pub fn new(
        store: Arc<dyn AuthorizationCodeStore>,
        generator: Arc<dyn SecretGenerator>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
            ttl,
        }
    }
}
