//! # Atomic platform client
//!
//! Talks to the Atomic card platform on behalf of a backend application:
//! sends events, queries and actions cards, manages users, API credentials
//! and webhooks, and issues identity tokens for the browser card SDK.
//!
//! Modules:
//! - `auth`: roles, credential pairs and the OAuth2 token provider
//! - `api`: operation catalog, request dispatcher and `AtomicClient`
//! - `identity`: signed and self-verified identity JWTs
//! - `model`: events, cards, users and custom fields
//! - `config`: immutable client configuration, YAML loading and validation

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod helpers;
pub mod identity;
pub mod model;
pub mod observability;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::api::client::AtomicClient;
pub use crate::api::dispatcher::{Query, RequestDispatcher};
pub use crate::api::operation::{Operation, PathParams, Scope};
pub use crate::auth::role::Role;
pub use crate::auth::token_provider::TokenProvider;
pub use crate::config::client::ClientConfig;
pub use crate::error::{ClientError, Result};
