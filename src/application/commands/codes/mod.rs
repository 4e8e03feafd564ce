mod issue;
mod service;

pub use issue::{IssueCodeCommand, IssuedCode};
pub use service::CodeIssuer;
