mod decide;
mod service;

pub use decide::ConsentCommand;
pub use service::ConsentService;
