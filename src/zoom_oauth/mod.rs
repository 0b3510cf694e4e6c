//! Provider-facing OAuth2 plumbing and the token lifecycle built on it.
//!
//! - `jwt.rs`: payload-only expiry inspection of bearer tokens
//! - `endpoints.rs`: the stateless provider exchanges
//! - `service.rs`: bootstrap and get-a-usable-token flows

pub mod endpoints;
pub mod jwt;
pub mod service;

pub use service::TokenLifecycle;
