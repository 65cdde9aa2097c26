//! Error types for the DNS-hosting API client.
//!
//! # Design
//! Every fallible boundary (builder validation, envelope decoding, dispatch)
//! returns `ApiError`. Delete operations get their own `ApiAction` variant
//! because the provider signals success there only through a 204 status.
//! All other non-2xx responses land in `Http` with the raw status code and
//! body so callers can inspect what the provider said.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `DnsClient` operations and the entity builders.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Builder input failed validation, or a response could not be decoded
    /// into the expected entity.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// A delete call did not answer with 204.
    #[error("API action failed: {0}")]
    ApiAction(String),

    /// The provider returned a non-2xx status on a non-delete call.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport could not complete the HTTP exchange.
    #[error("transport error: {0}")]
    Transport(String),

    /// Client configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn data_format(msg: impl Into<String>) -> Self {
        Self::DataFormat(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The provider answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }

    /// HTTP status carried by the error, if the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
