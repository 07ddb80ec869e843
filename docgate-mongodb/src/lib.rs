//! MongoDB document-store backend for docgate.
//!
//! This crate implements the gateway's store boundary on top of MongoDB's
//! async driver. Conformed filters, sort specs, and projections are
//! translated into native BSON query documents so that filtering, ordering,
//! and pagination all execute inside MongoDB rather than in the gateway.
//!
//! # Connection
//!
//! The backend needs a MongoDB connection string and a database name:
//!
//! ```ignore
//! use docgate_mongodb::MongoStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoStore::connect("mongodb://localhost:27017", "portfolio").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod store;
pub mod translate;

pub use store::MongoStore;
