//! Canonical request construction and dispatch.
//!
//! # Design
//! Every entry point funnels into [`build_request`], which holds all of the
//! validation and assembly rules, and [`HttpDispatcher::send`], which is the
//! only caller of [`Transport::execute`]. The `get*`/`post*`/`request*`
//! methods are one-line adapters that fill in a [`RequestArgs`] and never
//! validate anything on their own.
//!
//! The dispatcher holds nothing but the injected transport; each call is
//! independent.

use crate::error::{DispatchError, InvalidArgument};
use crate::http::{HttpMethod, HttpRequest};
use crate::options::{GetOptions, OptionsArg, PostOptions};
use crate::params::{PostData, QueryString};
use crate::transport::Transport;

/// Every input a request can be built from.
///
/// Explicit parameters and an options value are mutually exclusive.
#[derive(Debug, Clone)]
pub struct RequestArgs<'a> {
    pub method: HttpMethod,
    pub url: String,
    pub query: Option<QueryString>,
    pub body: Option<PostData>,
    pub options: Option<OptionsArg<'a>>,
}

impl<'a> RequestArgs<'a> {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: None,
            body: None,
            options: None,
        }
    }

    /// Query parameters from a raw multimap or a pre-built [`QueryString`].
    pub fn query(mut self, query: impl Into<QueryString>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Form body from a raw multimap or a pre-built [`PostData`].
    pub fn body(mut self, body: impl Into<PostData>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Required read options; `None` is rejected at build time.
    pub fn get_options<O: GetOptions + 'a>(mut self, options: Option<&'a O>) -> Self {
        self.options = Some(OptionsArg::from_get(options));
        self
    }

    /// Required write options; `None` is rejected at build time.
    pub fn post_options<O: PostOptions + 'a>(mut self, options: Option<&'a O>) -> Self {
        self.options = Some(OptionsArg::from_post(options));
        self
    }
}

/// Validate `args` and assemble the canonical request.
///
/// The URL is kept byte for byte; it is only checked for being blank.
/// Empty query or body collections are normalized to `None`.
pub fn build_request(args: RequestArgs<'_>) -> Result<HttpRequest, InvalidArgument> {
    let RequestArgs {
        method,
        url,
        query,
        body,
        options,
    } = args;

    if url.trim().is_empty() {
        return Err(InvalidArgument::new("url", "must not be empty or whitespace"));
    }

    let (query, body) = match options {
        None => (query, body),
        Some(_) if query.is_some() || body.is_some() => {
            return Err(InvalidArgument::new(
                "options",
                "cannot be combined with explicit query or body parameters",
            ));
        }
        Some(OptionsArg::Missing) => {
            return Err(InvalidArgument::new("options", "required but not supplied"));
        }
        Some(OptionsArg::Get(options)) => (Some(options.query_string()), None),
        Some(OptionsArg::Post(options)) => (Some(options.query_string()), Some(options.post_data())),
    };

    Ok(HttpRequest {
        method,
        url,
        query: query.filter(|q| !q.is_empty()),
        body: body.filter(|b| !b.is_empty()),
    })
}

/// Stateless request facade over a [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct HttpDispatcher<T> {
    transport: T,
}

impl<T: Transport> HttpDispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Build the canonical request and execute it once.
    ///
    /// Validation failures never reach the transport. Transport results,
    /// successful or not, are returned as they are.
    pub fn send(&self, args: RequestArgs<'_>) -> Result<T::Response, DispatchError<T::Error>> {
        let request = match build_request(args) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(target: "social_http::dispatch", err = %err, "rejected request");
                return Err(err.into());
            }
        };

        tracing::debug!(
            target: "social_http::dispatch",
            method = %request.method,
            url = %request.url,
            query_len = request.query.as_ref().map_or(0, QueryString::len),
            body_len = request.body.as_ref().map_or(0, PostData::len),
            "dispatching request"
        );

        self.transport.execute(request).map_err(DispatchError::Transport)
    }

    // -----------------------------------------------------------------------
    // GET
    // -----------------------------------------------------------------------

    pub fn get(&self, url: &str) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Get, url))
    }

    pub fn get_with_query(
        &self,
        url: &str,
        query: impl Into<QueryString>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Get, url).query(query))
    }

    pub fn get_with_options<O: GetOptions>(
        &self,
        url: &str,
        options: Option<&O>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Get, url).get_options(options))
    }

    // -----------------------------------------------------------------------
    // POST
    // -----------------------------------------------------------------------

    pub fn post(&self, url: &str) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Post, url))
    }

    pub fn post_with_query(
        &self,
        url: &str,
        query: impl Into<QueryString>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Post, url).query(query))
    }

    pub fn post_body(
        &self,
        url: &str,
        body: impl Into<PostData>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Post, url).body(body))
    }

    pub fn post_with_data(
        &self,
        url: &str,
        query: impl Into<QueryString>,
        body: impl Into<PostData>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Post, url).query(query).body(body))
    }

    /// POST with only a query string taken from read options.
    pub fn post_with_get_options<O: GetOptions>(
        &self,
        url: &str,
        options: Option<&O>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Post, url).get_options(options))
    }

    pub fn post_with_options<O: PostOptions>(
        &self,
        url: &str,
        options: Option<&O>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(HttpMethod::Post, url).post_options(options))
    }

    // -----------------------------------------------------------------------
    // Any method
    // -----------------------------------------------------------------------

    pub fn request(
        &self,
        method: HttpMethod,
        url: &str,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(method, url))
    }

    pub fn request_with(
        &self,
        method: HttpMethod,
        url: &str,
        query: impl Into<QueryString>,
        body: impl Into<PostData>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(method, url).query(query).body(body))
    }

    /// Options are optional here: `None` sends the request without a query.
    pub fn request_with_options<O: GetOptions>(
        &self,
        method: HttpMethod,
        url: &str,
        options: Option<&O>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        let args = RequestArgs::new(method, url);
        self.send(match options {
            Some(options) => args.get_options(Some(options)),
            None => args,
        })
    }

    /// Any method with query and body taken from write options.
    pub fn request_with_post_options<O: PostOptions>(
        &self,
        method: HttpMethod,
        url: &str,
        options: Option<&O>,
    ) -> Result<T::Response, DispatchError<T::Error>> {
        self.send(RequestArgs::new(method, url).post_options(options))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every request and answers with a fixed status.
    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Recorder {
        fn requests(&self) -> Vec<HttpRequest> {
            self.seen.borrow().clone()
        }
    }

    impl Transport for Recorder {
        type Response = u16;
        type Error = std::io::Error;

        fn execute(&self, request: HttpRequest) -> Result<u16, std::io::Error> {
            self.seen.borrow_mut().push(request);
            Ok(200)
        }
    }

    struct Failing;

    impl Transport for Failing {
        type Response = u16;
        type Error = std::io::Error;

        fn execute(&self, _request: HttpRequest) -> Result<u16, std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"))
        }
    }

    struct Search;

    impl GetOptions for Search {
        fn query_string(&self) -> QueryString {
            QueryString::from(vec![("q", "x")])
        }
    }

    struct Comment;

    impl GetOptions for Comment {
        fn query_string(&self) -> QueryString {
            QueryString::from(vec![("q", "x")])
        }
    }

    impl PostOptions for Comment {
        fn post_data(&self) -> PostData {
            PostData::from(vec![("f", "y")])
        }
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn url_and_method_are_kept_exactly() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);
        let url = "  https://api.example.com/v1/Items?x=1 ";

        dispatcher.request(HttpMethod::Delete, url).unwrap();

        let seen = recorder.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Delete);
        assert_eq!(seen[0].url, url);
        assert!(seen[0].query.is_none());
        assert!(seen[0].body.is_none());
    }

    #[test]
    fn blank_url_never_reaches_transport() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);

        for url in ["", " ", "\t\n"] {
            let err = dispatcher.get(url).unwrap_err();
            assert_eq!(err.invalid_argument().unwrap().name, "url");
            let err = dispatcher.post_with_data(url, [("a", "1")], [("b", "2")]).unwrap_err();
            assert!(err.is_invalid_argument());
            let err = dispatcher.post_with_options(url, Some(&Comment)).unwrap_err();
            assert!(err.is_invalid_argument());
        }

        assert!(recorder.requests().is_empty());
    }

    #[test]
    fn raw_query_reaches_transport_in_order() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);

        dispatcher
            .get_with_query("http://localhost/", vec![("a", "1"), ("b", "2")])
            .unwrap();

        let seen = recorder.requests();
        let query = seen[0].query.as_ref().unwrap();
        assert_eq!(query.as_pairs(), pairs(&[("a", "1"), ("b", "2")]).as_slice());
    }

    #[test]
    fn post_options_supply_query_and_body() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);

        let status = dispatcher.post_with_options("http://localhost/comments", Some(&Comment)).unwrap();
        assert_eq!(status, 200);

        let seen = recorder.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].query, Some(QueryString::from(vec![("q", "x")])));
        assert_eq!(seen[0].body, Some(PostData::from(vec![("f", "y")])));
    }

    #[test]
    fn write_options_drive_any_method() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);
        let url = "http://localhost/comments/3";

        dispatcher
            .request_with_post_options(HttpMethod::Patch, url, Some(&Comment))
            .unwrap();
        dispatcher
            .send(RequestArgs::new(HttpMethod::Patch, url).post_options(Some(&Comment)))
            .unwrap();
        let err = dispatcher
            .request_with_post_options::<Comment>(HttpMethod::Put, url, None)
            .unwrap_err();
        assert_eq!(err.invalid_argument().unwrap().name, "options");

        let seen = recorder.requests();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[0].method, HttpMethod::Patch);
        assert_eq!(seen[0].query, Some(QueryString::from(vec![("q", "x")])));
        assert_eq!(seen[0].body, Some(PostData::from(vec![("f", "y")])));
    }

    #[test]
    fn get_options_supply_query_only() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);

        dispatcher.get_with_options("http://localhost/search", Some(&Search)).unwrap();
        dispatcher.post_with_get_options("http://localhost/search", Some(&Comment)).unwrap();

        let seen = recorder.requests();
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].query, Some(QueryString::from(vec![("q", "x")])));
        assert!(seen[0].body.is_none());
        assert_eq!(seen[1].method, HttpMethod::Post);
        assert!(seen[1].body.is_none());
    }

    #[test]
    fn equivalent_shapes_build_identical_requests() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);
        let url = "http://localhost/items";

        dispatcher.get_with_query(url, vec![("a", "1"), ("b", "2")]).unwrap();
        dispatcher
            .get_with_query(url, QueryString::new().with("a", "1").with("b", "2"))
            .unwrap();
        dispatcher.get_with_query(url, [("a", "1"), ("b", "2")]).unwrap();
        dispatcher.request_with_options(HttpMethod::Get, url, Some(&Search)).unwrap();
        dispatcher.get_with_options(url, Some(&Search)).unwrap();

        dispatcher.post_with_data(url, [("q", "x")], [("f", "y")]).unwrap();
        dispatcher.post_with_options(url, Some(&Comment)).unwrap();
        dispatcher
            .request_with(HttpMethod::Post, url, QueryString::from([("q", "x")]), PostData::from([("f", "y")]))
            .unwrap();

        let seen = recorder.requests();
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[1], seen[2]);
        assert_eq!(seen[3], seen[4]);
        assert_eq!(seen[5], seen[6]);
        assert_eq!(seen[6], seen[7]);
        assert_eq!(
            serde_json::to_string(&seen[5]).unwrap(),
            serde_json::to_string(&seen[7]).unwrap()
        );
    }

    #[test]
    fn absent_and_empty_parameters_are_equivalent() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);

        dispatcher.post("http://localhost/").unwrap();
        dispatcher
            .post_with_data("http://localhost/", QueryString::new(), PostData::new())
            .unwrap();
        dispatcher
            .request_with_options::<Search>(HttpMethod::Post, "http://localhost/", None)
            .unwrap();

        let seen = recorder.requests();
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[1], seen[2]);
    }

    #[test]
    fn mutating_source_after_send_does_not_change_request() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);
        let mut raw = pairs(&[("a", "1"), ("b", "2")]);

        dispatcher.get_with_query("http://localhost/", &raw).unwrap();
        raw[0].1 = "mutated".to_string();
        raw.push(("c".to_string(), "3".to_string()));

        let seen = recorder.requests();
        assert_eq!(
            seen[0].query.as_ref().unwrap().as_pairs(),
            pairs(&[("a", "1"), ("b", "2")]).as_slice()
        );
    }

    #[test]
    fn missing_required_options_never_reach_transport() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);

        let err = dispatcher.get_with_options::<Search>("http://localhost/", None).unwrap_err();
        assert_eq!(err.invalid_argument().unwrap().name, "options");
        let err = dispatcher.post_with_options::<Comment>("http://localhost/", None).unwrap_err();
        assert_eq!(err.invalid_argument().unwrap().name, "options");
        let err = dispatcher.post_with_get_options::<Search>("http://localhost/", None).unwrap_err();
        assert!(err.is_invalid_argument());

        assert!(recorder.requests().is_empty());
    }

    #[test]
    fn options_and_explicit_parameters_are_exclusive() {
        let recorder = Recorder::default();
        let dispatcher = HttpDispatcher::new(&recorder);

        let args = RequestArgs::new(HttpMethod::Post, "http://localhost/")
            .query([("a", "1")])
            .post_options(Some(&Comment));
        let err = dispatcher.send(args).unwrap_err();
        assert_eq!(err.invalid_argument().unwrap().name, "options");

        let args = RequestArgs::new(HttpMethod::Get, "http://localhost/")
            .get_options(Some(&Search))
            .body([("f", "y")]);
        assert!(dispatcher.send(args).unwrap_err().is_invalid_argument());

        assert!(recorder.requests().is_empty());
    }

    #[test]
    fn blank_url_is_reported_before_missing_options() {
        let args = RequestArgs::new(HttpMethod::Get, " ").get_options::<Search>(None);
        assert_eq!(build_request(args).unwrap_err().name, "url");
    }

    #[test]
    fn transport_errors_pass_through_unchanged() {
        let dispatcher = HttpDispatcher::new(Failing);
        let err = dispatcher.get("http://localhost/").unwrap_err();
        assert!(!err.is_invalid_argument());
        let io = err.into_transport().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
        assert_eq!(io.to_string(), "refused");
    }

    #[test]
    fn build_request_without_transport() {
        let request = build_request(
            RequestArgs::new(HttpMethod::Put, "http://localhost/items/1").body(vec![("name", "new")]),
        )
        .unwrap();
        assert_eq!(request.method, HttpMethod::Put);
        assert!(request.query.is_none());
        assert_eq!(request.body.unwrap().get("name"), Some("new"));
    }

    /// Thread-safe recorder for sharing one dispatcher across threads.
    #[derive(Default)]
    struct SharedRecorder {
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for SharedRecorder {
        type Response = ();
        type Error = std::io::Error;

        fn execute(&self, request: HttpRequest) -> Result<(), std::io::Error> {
            self.seen.lock().unwrap().push(request);
            Ok(())
        }
    }

    #[test]
    fn concurrent_calls_share_one_dispatcher() {
        let dispatcher = Arc::new(HttpDispatcher::new(SharedRecorder::default()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dispatcher = Arc::clone(&dispatcher);
                std::thread::spawn(move || {
                    let page = i.to_string();
                    dispatcher
                        .get_with_query("http://localhost/items", [("page", page.as_str())])
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let seen = dispatcher.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 8);
        let mut pages: Vec<u32> = seen
            .iter()
            .map(|r| r.query.as_ref().unwrap().get("page").unwrap().parse().unwrap())
            .collect();
        pages.sort_unstable();
        assert_eq!(pages, (0..8u32).collect::<Vec<_>>());
    }
}
