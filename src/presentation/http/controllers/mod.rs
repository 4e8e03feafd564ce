// src/presentation/http/controllers/mod.rs
pub mod authorization;
pub mod discovery;
pub mod introspection;
pub mod token;
