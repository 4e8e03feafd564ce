// src/infrastructure/security/mod.rs
pub mod authorization_code_store;
pub mod claims;
pub mod client_registry;
pub mod one_shot;
pub mod random;
pub mod redis_store;
pub mod secret_hasher;
pub mod ticket_store;
pub mod token;
pub mod token_store;
