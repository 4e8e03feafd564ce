mod exchange;
mod mint;
mod refresh;
mod revoke;
mod service;

pub use exchange::ExchangeCodeCommand;
pub use refresh::RefreshTokenCommand;
pub use revoke::RevokeTokenCommand;
pub use service::{TokenExchanger, TokenPolicy};
