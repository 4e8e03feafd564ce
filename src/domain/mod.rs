pub mod errors;
pub mod oauth;
