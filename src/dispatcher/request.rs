use crate::ids::RequestId;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

/// Inbound request body type.
pub type Body = Vec<u8>;

/// Inbound request as handed to the router by the transport.
pub type Request = http::Request<Body>;

/// Maximum number of route parameters before heap allocation.
/// Most route patterns capture at most a handful of values.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Named parameters as `(group name, captured value)` pairs, in capture order.
///
/// Group names come from the compiled matcher and are shared via `Arc<str>`.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Positional parameters, one per capturing sub-group of the matched route.
pub type PositionalVec = SmallVec<[String; MAX_INLINE_PARAMS]>;

/// A request enriched with what the router learned while matching it.
///
/// Dereferences to the inner [`http::Request`], so `req.method()`,
/// `req.uri()` and `req.headers()` work directly.
#[derive(Debug)]
pub struct RouteRequest {
    pub(crate) request_id: RequestId,
    pub(crate) inner: Request,
    pub(crate) route_slot: usize,
    pub(crate) named_params: ParamVec,
    pub(crate) params: PositionalVec,
    pub(crate) raw_captures: Vec<String>,
    pub(crate) pattern: Arc<str>,
    pub(crate) combined_pattern: Arc<str>,
}

impl RouteRequest {
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Registration slot of the route that matched.
    #[must_use]
    pub fn route_slot(&self) -> usize {
        self.route_slot
    }

    /// Positional parameter `i` (0-based over the route's own capturing groups).
    ///
    /// A group that did not take part in the match yields `""`.
    #[must_use]
    pub fn param(&self, i: usize) -> Option<&str> {
        self.params.get(i).map(String::as_str)
    }

    /// All positional parameters, named or not, in capture order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Get a named parameter
    ///
    /// Uses "last write wins" semantics: if the same group name appears more
    /// than once in a route, returns the last occurrence.
    #[inline]
    #[must_use]
    pub fn named_param(&self, name: &str) -> Option<&str> {
        self.named_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn named_params(&self) -> &ParamVec {
        &self.named_params
    }

    /// Convert named params to a HashMap
    /// Note: This allocates - use named_param() in hot paths instead
    #[must_use]
    pub fn named_params_map(&self) -> HashMap<String, String> {
        self.named_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Every capture of the combined pattern, indexed by group number.
    /// Slot 0 is the whole match; non-participating groups are `""`.
    #[must_use]
    pub fn raw_captures(&self) -> &[String] {
        &self.raw_captures
    }

    /// The registered pattern of the route that matched.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The combined alternation pattern that was matched.
    #[must_use]
    pub fn combined_pattern(&self) -> &str {
        &self.combined_pattern
    }

    #[must_use]
    pub fn inner(&self) -> &Request {
        &self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> Request {
        self.inner
    }
}

impl Deref for RouteRequest {
    type Target = Request;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Response sink handed to handlers and fallbacks.
///
/// Starts out unwritten with status 200 and an empty body. Any write marks it
/// written; the transport can use [`Response::is_written`] to tell a produced
/// response from a route that fell through.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    written: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            written: false,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.written = true;
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
        self.written = true;
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Append raw bytes to the body.
    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
        self.written = true;
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, lossy.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Replace the response with a plain-text body
    pub fn text(&mut self, status: StatusCode, body: &str) {
        self.status = status;
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        self.headers.insert(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        );
        self.body = body.as_bytes().to_vec();
        self.written = true;
    }

    /// Replace the response with a JSON body
    pub fn json(&mut self, status: StatusCode, body: &Value) {
        self.status = status;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = body.to_string().into_bytes();
        self.written = true;
    }

    /// Whether a handler or fallback produced anything.
    #[must_use]
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Convert into an [`http::Response`] for the transport.
    #[must_use]
    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let mut res = http::Response::new(self.body);
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route_request() -> RouteRequest {
        let mut named = ParamVec::new();
        named.push((Arc::from("id"), "1".to_string()));
        named.push((Arc::from("id"), "2".to_string()));
        RouteRequest {
            request_id: RequestId::new(),
            inner: http::Request::builder()
                .method("GET")
                .uri("/org/1/user/2")
                .body(Vec::new())
                .unwrap(),
            route_slot: 3,
            named_params: named,
            params: PositionalVec::from_vec(vec!["1".to_string(), "2".to_string()]),
            raw_captures: vec![],
            pattern: Arc::from(r"/org/(?P<id>\d+)/user/(?P<id2>\d+)"),
            combined_pattern: Arc::from(""),
        }
    }

    #[test]
    fn test_named_param_last_write_wins() {
        let req = route_request();
        assert_eq!(req.named_param("id"), Some("2"));
        assert_eq!(req.named_param("missing"), None);
        assert_eq!(req.named_params_map().get("id").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_route_request_derefs_to_http_request() {
        let req = route_request();
        assert_eq!(req.method(), http::Method::GET);
        assert_eq!(req.uri().path(), "/org/1/user/2");
        assert_eq!(req.param(1), Some("2"));
        assert_eq!(req.param(2), None);
        assert_eq!(req.route_slot(), 3);
    }

    #[test]
    fn test_route_request_gives_back_inner_request() {
        let req = route_request();
        assert_eq!(req.inner().uri().path(), "/org/1/user/2");
        let inner = req.into_inner();
        assert_eq!(inner.method(), http::Method::GET);
        assert!(inner.body().is_empty());
    }

    #[test]
    fn test_set_header_marks_written() {
        let mut res = Response::new();
        res.set_header(
            HeaderName::from_static("x-route"),
            HeaderValue::from_static("blog"),
        );
        assert!(res.is_written());
        assert_eq!(res.get_header("X-Route"), Some("blog"));
        let http = res.into_http();
        assert_eq!(http.headers()["x-route"], "blog");
    }

    #[test]
    fn test_response_starts_unwritten() {
        let res = Response::new();
        assert!(!res.is_written());
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.body().is_empty());
    }

    #[test]
    fn test_response_text_and_json() {
        let mut res = Response::new();
        res.text(StatusCode::NOT_FOUND, "nope\n");
        assert!(res.is_written());
        assert_eq!(res.body_text(), "nope\n");
        assert_eq!(res.get_header("content-type"), Some("text/plain; charset=utf-8"));

        res.json(StatusCode::CREATED, &json!({"ok": true}));
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.get_header("Content-Type"), Some("application/json"));
        let http = res.into_http();
        assert_eq!(http.status(), StatusCode::CREATED);
        assert_eq!(http.body().as_slice(), br#"{"ok":true}"#);
    }
}
