mod consume;
mod create;
mod service;

pub use create::CreateTicketCommand;
pub use service::{TicketCommandService, TicketPolicy};
