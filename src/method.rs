//! Recognized HTTP methods and the fixed per-route handler table.
//!
//! A route's handlers are stored in a [`MethodTable`]: one optional slot per
//! recognized method, indexed by [`HttpMethod`]. An empty slot means requests
//! with that method fall through silently when the route matches.

use crate::dispatcher::Handler;
use crate::error::RouterError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The nine HTTP methods a route may register handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl HttpMethod {
    /// All recognized methods in table slot order.
    pub const ALL: [HttpMethod; 9] = [
        HttpMethod::Connect,
        HttpMethod::Delete,
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Patch,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Trace,
    ];

    /// Parse a method name. Exact, case-sensitive match only.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONNECT" => Some(HttpMethod::Connect),
            "DELETE" => Some(HttpMethod::Delete),
            "GET" => Some(HttpMethod::Get),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            "PATCH" => Some(HttpMethod::Patch),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "TRACE" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Trace => "TRACE",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = RouterError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        HttpMethod::parse(method.as_str()).ok_or_else(|| RouterError::InvalidMethod {
            method: method.as_str().to_string(),
        })
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Connect => http::Method::CONNECT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Head => http::Method::HEAD,
            HttpMethod::Options => http::Method::OPTIONS,
            HttpMethod::Patch => http::Method::PATCH,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Trace => http::Method::TRACE,
        }
    }
}

/// Handler table keyed by method name, as accepted by `Router::register`.
pub type HandlersMap = HashMap<String, Arc<dyn Handler>>;

/// Fixed handler slots for one route, one per [`HttpMethod`].
#[derive(Clone, Default)]
pub struct MethodTable {
    slots: [Option<Arc<dyn Handler>>; 9],
}

impl MethodTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every key of `handlers` and build the table.
    ///
    /// Fails on the first unrecognized key without producing a partial table.
    pub fn from_map(handlers: HandlersMap) -> Result<Self, RouterError> {
        let mut table = Self::new();
        for (name, handler) in handlers {
            let method = HttpMethod::parse(&name)
                .ok_or(RouterError::InvalidMethod { method: name })?;
            table.insert(method, handler);
        }
        Ok(table)
    }

    /// Set the handler for `method`, replacing any previous one.
    pub fn insert(&mut self, method: HttpMethod, handler: Arc<dyn Handler>) {
        self.slots[method.slot()] = Some(handler);
    }

    #[must_use]
    pub fn get(&self, method: HttpMethod) -> Option<&Arc<dyn Handler>> {
        self.slots[method.slot()].as_ref()
    }

    /// Methods that have a handler, in slot order.
    #[must_use]
    pub fn methods(&self) -> Vec<HttpMethod> {
        HttpMethod::ALL
            .iter()
            .copied()
            .filter(|m| self.slots[m.slot()].is_some())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.methods())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::handler;

    fn noop() -> Arc<dyn Handler> {
        handler(|_res, _req| Ok(()))
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("get"), None);
        assert_eq!(HttpMethod::parse("Get"), None);
        assert_eq!(HttpMethod::parse("PROPFIND"), None);
    }

    #[test]
    fn test_all_methods_round_trip_through_names() {
        for method in HttpMethod::ALL {
            assert_eq!(HttpMethod::parse(method.as_str()), Some(method));
            let http_method: http::Method = method.into();
            assert_eq!(HttpMethod::try_from(&http_method).ok(), Some(method));
        }
    }

    #[test]
    fn test_from_map_rejects_unknown_method() {
        let mut handlers = HandlersMap::new();
        handlers.insert("GET".to_string(), noop());
        handlers.insert("FETCH".to_string(), noop());
        match MethodTable::from_map(handlers) {
            Err(RouterError::InvalidMethod { method }) => assert_eq!(method, "FETCH"),
            other => panic!("expected InvalidMethod, got {:?}", other.map(|t| t.methods())),
        }
    }

    #[test]
    fn test_from_map_fills_slots() {
        let mut handlers = HandlersMap::new();
        handlers.insert("POST".to_string(), noop());
        handlers.insert("DELETE".to_string(), noop());
        let table = MethodTable::from_map(handlers).unwrap();
        assert_eq!(table.methods(), vec![HttpMethod::Delete, HttpMethod::Post]);
        assert!(table.get(HttpMethod::Get).is_none());
        assert!(!table.is_empty());
    }
}
