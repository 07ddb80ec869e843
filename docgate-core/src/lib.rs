//! Core of the docgate REST-over-document-store gateway.
//!
//! This crate holds everything that is independent of a concrete store,
//! cache, or transport:
//!
//! - **Schema registry and resource resolution** ([`schema`]) - Declared
//!   entity shapes, the legacy pluralizer, and plural-path-to-schema lookup
//! - **Query conformance** ([`conform`]) - Translation of raw query
//!   parameters into a structured filter/sort/projection/pagination request,
//!   including the operator-expression decoder
//! - **Pagination links** ([`links`]) - HATEOAS first/prev/self/next/last
//!   link generation that round-trips conformed queries
//! - **Response envelope** ([`envelope`]) - The list-read response wrapper
//! - **CRUD execution** ([`executor`]) - Create/read/update/delete against a
//!   store backend, shaping list reads into envelopes
//! - **Backend boundaries** ([`backend`], [`cache`]) - Traits the document
//!   store and key-value cache implementations plug into
//! - **Error handling** ([`error`]) - Error kinds and the shared result type
//!
//! # Example
//!
//! ```ignore
//! use docgate_core::conform::conform;
//!
//! let query = conform(vec![
//!     ("_limit".to_string(), "5".to_string()),
//!     ("price".to_string(), "gte:10:lt:20".to_string()),
//! ]);
//!
//! assert_eq!(query.limit, 5);
//! ```

pub mod backend;
pub mod cache;
pub mod conform;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod links;
pub mod schema;
