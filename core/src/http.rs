//! HTTP request and response types described as plain data.
//!
//! # Design
//! `HttpRequest` is the canonical value produced by
//! [`build_request`](crate::dispatcher::build_request): every convenience entry
//! point on the dispatcher ends up here, so two calls that differ only in
//! calling style produce equal values. All fields are owned so the request can
//! be moved into a transport without borrowing anything from the caller.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgument;
use crate::params::{PostData, QueryString};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// The upper-case method token as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Whether requests with this method carry a body.
    pub fn allows_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(InvalidArgument::new("method", "unknown HTTP method")),
        }
    }
}

/// The canonical request handed to a [`Transport`](crate::Transport).
///
/// `url` is the base URL exactly as the caller supplied it. The query string
/// is kept separate and only merged into the URL by [`HttpRequest::full_url`].
/// Empty parameter collections are stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PostData>,
}

impl HttpRequest {
    /// The URL with the encoded query string appended.
    ///
    /// The query goes in front of any `#fragment`. A URL that already ends in
    /// `?` or `&` gets no extra separator.
    pub fn full_url(&self) -> Result<String, serde_urlencoded::ser::Error> {
        let query = match &self.query {
            Some(query) if !query.is_empty() => query.to_urlencoded()?,
            _ => return Ok(self.url.clone()),
        };
        let (base, fragment) = match self.url.find('#') {
            Some(at) => self.url.split_at(at),
            None => (self.url.as_str(), ""),
        };
        let separator = if base.ends_with('?') || base.ends_with('&') {
            ""
        } else if base.contains('?') {
            "&"
        } else {
            "?"
        };
        Ok(format!("{base}{separator}{query}{fragment}"))
    }

    /// The form-urlencoded body, if the request carries one.
    pub fn encoded_body(&self) -> Result<Option<String>, serde_urlencoded::ser::Error> {
        self.body.as_ref().map(PostData::to_urlencoded).transpose()
    }
}

/// An HTTP response described as plain data.
///
/// Produced by `UreqTransport`. The dispatcher never looks inside it; status
/// codes are reported as-is, including 4xx and 5xx. The body is kept as raw
/// bytes whatever its encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub method: HttpMethod,
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// The body as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// The body as text, with invalid sequences replaced by U+FFFD.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
