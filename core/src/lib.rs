//! Request-building facade over a pluggable HTTP transport.
//!
//! # Overview
//! Callers hand in a URL plus query parameters and form fields in whatever
//! shape they have at hand: raw key/value pairs, pre-built collections, or an
//! options value. The dispatcher normalizes all of them into one canonical
//! [`HttpRequest`] and passes it to a [`Transport`], returning the
//! transport's response untouched.
//!
//! # Design
//! - `build_request` is the single place where input is validated and the
//!   canonical request is assembled. It is pure and usable on its own.
//! - `HttpDispatcher` holds only its transport. The `get*`/`post*`/`request*`
//!   methods delegate to `send` and carry no logic of their own.
//! - `UreqTransport` (feature `ureq`, on by default) performs blocking I/O.
//!   Any other HTTP stack can be plugged in by implementing `Transport`.

pub mod dispatcher;
pub mod error;
pub mod http;
pub mod options;
pub mod params;
pub mod transport;

pub use dispatcher::{build_request, HttpDispatcher, RequestArgs};
#[cfg(feature = "ureq")]
pub use error::TransportError;
pub use error::{DispatchError, InvalidArgument};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{GetOptions, OptionsArg, PostOptions};
pub use params::{PostData, QueryString};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::{TransportConfig, UreqTransport};
