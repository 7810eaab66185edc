//! Dispatcher core module - hot path for request dispatch.
//!
//! Resolves a match of the combined pattern back to the route that produced
//! it, extracts that route's parameters and runs exactly one handler or one
//! fallback.

use super::fallback::Fallbacks;
use super::request::{ParamVec, PositionalVec, Request, Response, RouteRequest};
use crate::ids::RequestId;
use crate::method::HttpMethod;
use crate::router::CompiledMatcher;
use regex::Captures;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// What a handler returns. Errors go to the error fallback.
pub type HandlerResult = anyhow::Result<()>;

/// A route handler for one method.
///
/// Implemented for any `Fn(&mut Response, &RouteRequest) -> HandlerResult`,
/// so closures and plain functions can be registered directly.
pub trait Handler: Send + Sync {
    fn handle(&self, res: &mut Response, req: &RouteRequest) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&mut Response, &RouteRequest) -> HandlerResult + Send + Sync,
{
    fn handle(&self, res: &mut Response, req: &RouteRequest) -> HandlerResult {
        self(res, req)
    }
}

/// Wrap a closure as a shareable [`Handler`].
///
/// Taking the closure through this bound lets its argument and return types
/// be inferred at the call site.
pub fn handler<F>(f: F) -> Arc<dyn Handler>
where
    F: Fn(&mut Response, &RouteRequest) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Which single side effect a routed request produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Dispatch {
    /// The route's handler ran and succeeded.
    Handled { route_slot: usize },
    /// The route's handler failed; the error fallback ran.
    HandlerFailed { route_slot: usize },
    /// No pattern matched; the not-found fallback ran.
    NotFound,
    /// A route matched but has no handler for the request method.
    /// Nothing was invoked and nothing was written.
    NoHandlerForMethod { route_slot: usize, method: String },
    /// The pattern matched but no top-level group captured anything (an
    /// empty router, or a route whose whole match is empty).
    /// Nothing was invoked.
    Unresolved,
}

/// Route `request` through a compiled matcher.
///
/// Handler execution is synchronous; this returns once the handler (or
/// fallback) has returned.
pub fn dispatch(
    matcher: &CompiledMatcher,
    fallbacks: &Fallbacks,
    request: Request,
    res: &mut Response,
    slow_match_threshold: Duration,
) -> Dispatch {
    let request_id = RequestId::from_header_or_new(
        request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
    );
    let span = tracing::info_span!(
        "route",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let _enter = span.enter();

    let match_start = Instant::now();
    let caps = matcher.regex().captures(request.uri().path());
    let match_duration = match_start.elapsed();

    let Some(caps) = caps else {
        warn!(duration_us = match_duration.as_micros(), "No route matched");
        fallbacks.not_found(res, &request);
        return Dispatch::NotFound;
    };

    // The first non-empty capture is always a top-level group: a sub-group
    // sits inside its wrapper, which is numbered before it. A route whose
    // whole match is empty is not resolvable.
    let Some((top, entry)) = matcher
        .index()
        .iter()
        .find(|(group, _)| caps.get(*group).is_some_and(|m| !m.is_empty()))
    else {
        warn!(
            duration_us = match_duration.as_micros(),
            "No handlers found"
        );
        return Dispatch::Unresolved;
    };

    let Some(route) = matcher.route(entry.route_slot) else {
        warn!(
            route_slot = entry.route_slot,
            "Matched group points at a missing route"
        );
        return Dispatch::Unresolved;
    };

    if match_duration > slow_match_threshold {
        warn!(
            route_slot = entry.route_slot,
            top_level_group = top,
            route_pattern = %route.pattern,
            duration_us = match_duration.as_micros(),
            "Slow route matching detected"
        );
    } else {
        debug!(
            route_slot = entry.route_slot,
            top_level_group = top,
            route_pattern = %route.pattern,
            duration_us = match_duration.as_micros(),
            "Route matched"
        );
    }

    let handler = HttpMethod::try_from(request.method())
        .ok()
        .and_then(|m| route.handlers.get(m));
    let Some(handler) = handler else {
        debug!(
            route_slot = entry.route_slot,
            "No handler registered for method"
        );
        return Dispatch::NoHandlerForMethod {
            route_slot: entry.route_slot,
            method: request.method().to_string(),
        };
    };

    let (named_params, params) = extract_params(matcher, &caps, &entry.sub_groups);
    let raw_captures = raw_captures(&caps);
    drop(caps);
    let req = RouteRequest {
        request_id,
        inner: request,
        route_slot: entry.route_slot,
        named_params,
        params,
        raw_captures,
        pattern: Arc::clone(&route.pattern),
        combined_pattern: Arc::clone(matcher.combined()),
    };

    let handler_start = Instant::now();
    let result = handler.handle(res, &req);
    let handler_duration = handler_start.elapsed();

    match result {
        Ok(()) => {
            info!(
                route_slot = entry.route_slot,
                status = res.status().as_u16(),
                duration_us = handler_duration.as_micros(),
                "Handler executed"
            );
            Dispatch::Handled {
                route_slot: entry.route_slot,
            }
        }
        Err(err) => {
            error!(
                route_slot = entry.route_slot,
                error = %err,
                duration_us = handler_duration.as_micros(),
                "Handler failed"
            );
            fallbacks.error(res, &req, &err);
            Dispatch::HandlerFailed {
                route_slot: entry.route_slot,
            }
        }
    }
}

/// Named and positional parameters for the route's sub-groups.
///
/// Every sub-group lands in the positional list; named groups also land in
/// the named list under their declared name.
fn extract_params(
    matcher: &CompiledMatcher,
    caps: &Captures<'_>,
    sub_groups: &[usize],
) -> (ParamVec, PositionalVec) {
    let mut named = ParamVec::new();
    let mut positional = PositionalVec::new();
    for &group in sub_groups {
        let value = caps.get(group).map(|m| m.as_str()).unwrap_or_default();
        if let Some(name) = matcher.group_name(group) {
            named.push((Arc::clone(name), value.to_string()));
        }
        positional.push(value.to_string());
    }
    (named, positional)
}

fn raw_captures(caps: &Captures<'_>) -> Vec<String> {
    caps.iter()
        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect()
}
