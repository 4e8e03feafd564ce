//! OAuth 2.0 authorization code + PKCE server with ticketed consent.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
