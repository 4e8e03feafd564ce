// src/application/ports/mod.rs
pub mod authorization_code;
pub mod client_registry;
pub mod security;
pub mod ticket_store;
pub mod time;
pub mod token_store;

