//! In-memory store and cache backends for docgate.
//!
//! This crate implements both gateway boundaries entirely in memory behind
//! async-aware read-write locks: a document store that evaluates the full
//! conformed-query surface (all nine filter operators, legacy sort and
//! projection specs, pagination) by scanning its collections, and a
//! TTL-expiring response cache. It is the gateway's test harness and is
//! also usable for local development without external services.
//!
//! # Quick Start
//!
//! ```ignore
//! use docgate_memory::{MemoryCache, MemoryStore};
//! use docgate_core::backend::DocumentBackend;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     let created = store
//!         .insert_one("skills", json!({ "title": "rust", "level": 4 }))
//!         .await?;
//!     assert!(created.get("_id").is_some());
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod evaluator;
pub mod store;

pub use cache::MemoryCache;
pub use store::MemoryStore;
