mod service;

pub use service::{IntrospectionQuery, IntrospectionService};
