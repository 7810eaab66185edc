//! Not-found and error fallbacks.
//!
//! At most one callback of each kind is active; setting a new one replaces
//! the old one. Unset callbacks fall back to plain-text 404 / 500 responses.

use super::request::{Request, Response, RouteRequest};
use http::StatusCode;
use std::sync::Arc;

/// Invoked when no registered pattern matches the request path.
pub type NotFoundCallback = Arc<dyn Fn(&mut Response, &Request) + Send + Sync>;

/// Invoked when a handler returns an error.
pub type ErrorCallback = Arc<dyn Fn(&mut Response, &RouteRequest, &anyhow::Error) + Send + Sync>;

/// The active fallback callbacks. Cloning is cheap.
#[derive(Clone, Default)]
pub struct Fallbacks {
    not_found: Option<NotFoundCallback>,
    error: Option<ErrorCallback>,
}

impl Fallbacks {
    pub fn set_not_found(&mut self, callback: NotFoundCallback) {
        self.not_found = Some(callback);
    }

    pub fn set_error(&mut self, callback: ErrorCallback) {
        self.error = Some(callback);
    }

    pub fn not_found(&self, res: &mut Response, req: &Request) {
        match &self.not_found {
            Some(callback) => callback(res, req),
            None => default_not_found(res, req),
        }
    }

    pub fn error(&self, res: &mut Response, req: &RouteRequest, err: &anyhow::Error) {
        match &self.error {
            Some(callback) => callback(res, req, err),
            None => default_error(res, req, err),
        }
    }
}

/// Plain-text `404 page not found`.
pub fn default_not_found(res: &mut Response, _req: &Request) {
    res.text(StatusCode::NOT_FOUND, "404 page not found\n");
}

/// Plain-text 500 carrying the error message.
pub fn default_error(res: &mut Response, _req: &RouteRequest, err: &anyhow::Error) {
    res.text(StatusCode::INTERNAL_SERVER_ERROR, &format!("{err}\n"));
}
