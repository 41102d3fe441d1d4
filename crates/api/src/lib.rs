//! HTTP transport for the inventory item lifecycle.
//!
//! Exposes config, state, error mapping, routes, and the router builder so
//! integration tests and the binary entrypoint share the same stack.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
