pub mod introspection;
pub mod tickets;
