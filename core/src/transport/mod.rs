//! The transport seam.
//!
//! # Design
//! The dispatcher only builds requests; a `Transport` performs the network
//! exchange. Response and error types belong to the transport, and the
//! dispatcher returns both unchanged. `UreqTransport` is the default
//! blocking implementation; tests and hosts with their own HTTP stack plug in
//! anything else.

use std::sync::Arc;

use crate::http::HttpRequest;

#[cfg(feature = "ureq")]
mod blocking;

#[cfg(feature = "ureq")]
pub use self::blocking::{TransportConfig, UreqTransport};

/// Executes a canonical request.
pub trait Transport {
    type Response;
    type Error;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Response = T::Response;
    type Error = T::Error;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, Self::Error> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    type Response = T::Response;
    type Error = T::Error;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, Self::Error> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Response = T::Response;
    type Error = T::Error;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, Self::Error> {
        (**self).execute(request)
    }
}
