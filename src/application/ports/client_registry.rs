// src/application/ports/client_registry.rs
use crate::application::ApplicationResult;
use crate::domain::oauth::{Client, ClientId};
use async_trait::async_trait;

#[async_trait]
pub trait ClientRegistry: Send + Sync {
    async fn find(&self, client_id: &ClientId) -> ApplicationResult<Option<Client>>;
}
