//! Error kinds and result types for gateway operations.
//!
//! Use [`GatewayResult<T>`] as the return type for fallible operations.
//! The variants follow the gateway's propagation policy: validation and
//! store errors surface to the caller immediately, cache errors are logged
//! and swallowed by the read pipeline, and a missing document is a value
//! (`Ok(None)`), not an error.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur inside the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// A request body failed the schema's constraints. Carries the names of
    /// the offending fields, surfaced verbatim to the caller.
    #[error("validation failed for fields: {}", fields.join(", "))]
    Validation {
        /// Fields that were missing or had an incompatible type.
        fields: Vec<String>,
    },
    /// No registered schema matches the requested resource path.
    #[error("no resource registered for path segment {0:?}")]
    NotFound(String),
    /// An operation against the document store failed. Not retried, not
    /// wrapped further.
    #[error("store error: {0}")]
    Store(String),
    /// A cache read or write failed. Never surfaced to the caller; the
    /// request proceeds as a cache miss.
    #[error("cache error: {0}")]
    Cache(String),
    /// Serialization/deserialization error when shaping documents or
    /// responses.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Error during startup: configuration, connection bootstrap, or schema
    /// registration.
    #[error("initialization error: {0}")]
    Initialization(String),
}

/// A specialized `Result` type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<SerdeJsonError> for GatewayError {
    fn from(err: SerdeJsonError) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}
