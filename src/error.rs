//! Error taxonomy shared by all service adapters
//!
//! Every failure the adapters can surface to the host gateway falls into
//! one of these variants, each carrying the HTTP status the gateway should
//! answer with.

use thiserror::Error;

/// Errors surfaced by service adapters to the host gateway
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Caller supplied a structurally invalid input (empty name, bad payload)
    #[error("{0}")]
    InvalidArgument(String),

    /// Referenced domain, item, or sub-resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Access-control oracle denied the requested action
    #[error("{0}")]
    Forbidden(String),

    /// Backend connection absent, transport failure, or bad backend response
    #[error("{0}")]
    Backend(String),

    /// Fatal configuration error at adapter construction time
    #[error("{0}")]
    Config(String),
}

impl AdapterError {
    /// HTTP status code the gateway should answer with
    pub fn status(&self) -> u16 {
        match self {
            AdapterError::InvalidArgument(_) => 400,
            AdapterError::Forbidden(_) => 403,
            AdapterError::NotFound(_) => 404,
            AdapterError::Backend(_) => 503,
            AdapterError::Config(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AdapterError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
