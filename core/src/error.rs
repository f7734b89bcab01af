//! Error types for request dispatch.
//!
//! # Design
//! Caller mistakes (`InvalidArgument`) are detected before a request exists
//! and are kept apart from whatever the transport reports. `DispatchError`
//! carries the transport's own error value untouched, so callers match on
//! the concrete transport error without any reclassification here.

use thiserror::Error;

/// A caller-supplied argument was rejected before any I/O happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid argument `{name}`: {reason}")]
pub struct InvalidArgument {
    /// Name of the offending parameter.
    pub name: &'static str,
    pub reason: &'static str,
}

impl InvalidArgument {
    pub fn new(name: &'static str, reason: &'static str) -> Self {
        Self { name, reason }
    }
}

/// Errors returned by [`HttpDispatcher`](crate::HttpDispatcher).
#[derive(Debug, Error)]
pub enum DispatchError<E> {
    /// The request was never built; the transport was not called.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The transport failed. The value is exactly what it returned.
    #[error(transparent)]
    Transport(E),
}

impl<E> DispatchError<E> {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, DispatchError::InvalidArgument(_))
    }

    pub fn invalid_argument(&self) -> Option<&InvalidArgument> {
        match self {
            DispatchError::InvalidArgument(err) => Some(err),
            DispatchError::Transport(_) => None,
        }
    }

    /// The transport error, if the failure came from the transport.
    pub fn into_transport(self) -> Option<E> {
        match self {
            DispatchError::Transport(err) => Some(err),
            DispatchError::InvalidArgument(_) => None,
        }
    }
}

/// Errors returned by `UreqTransport`.
#[cfg(feature = "ureq")]
#[derive(Debug, Error)]
pub enum TransportError {
    /// The query string or form body could not be encoded.
    #[error("failed to encode request parameters: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// Connection, timeout, TLS or body read failure.
    #[error("HTTP transport failed: {0}")]
    Http(#[from] ureq::Error),
}
