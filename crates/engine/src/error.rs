//! The module contains the errors the controller can surface.
//!
//! - [`RemoteError`] is what a [`FinanceApi`] call fails with.
//! - [`EngineError`] is what a controller operation fails with: either a
//!   remote failure or a local validation failure that stopped the request
//!   from being sent.
//!
//!  [`FinanceApi`]: crate::FinanceApi
use thiserror::Error;

/// Failure of a single remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// 4xx other than 404: the server rejected the request body or query.
    #[error("rejected ({status}): {message}")]
    Validation { status: u16, message: String },
    #[error("not found")]
    NotFound,
    /// 5xx and any other non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("server unreachable: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Maps a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound,
            400..=499 => Self::Validation { status, message },
            _ => Self::Server { status, message },
        }
    }
}

/// Controller custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Request failed: {0}")]
    Remote(#[from] RemoteError),
    #[error("\"{0}\" is required")]
    MissingField(&'static str),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
