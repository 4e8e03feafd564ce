// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod security;
pub mod time;

pub use security::{
    CLIENT_ID, CLIENT_SCOPE, CLIENT_SECRET, INTROSPECTION_KEY, OTHER_CLIENT_ID,
    OTHER_CLIENT_SECRET, OTHER_REDIRECT_URI, PlainSecretHasher, REDIRECT_URI, TEST_BISCUIT_KEY,
    TEST_ISSUER, test_clients,
};
pub use time::{ManualClock, fixed_now};
