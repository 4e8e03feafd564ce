pub mod clients;
pub mod codes;
pub mod consent;
pub mod tickets;
pub mod tokens;
