//! HTTP transport for docgate.
//!
//! This crate wires the core gateway to the outside world: an axum router
//! exposing the derived CRUD endpoints under `/api/resources`, a figment
//! configuration layer, the declared schemas, and static serving of the
//! client bundle. The binary connects the MongoDB store and Redis cache and
//! serves the router; tests drive the same router against the in-memory
//! backends.

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
