//! # Dispatcher Module
//!
//! The dispatcher turns one match of the combined pattern into exactly one
//! side effect: a route handler, the not-found fallback, or the error
//! fallback.
//!
//! ## Request Flow
//!
//! 1. Match the combined pattern against the request path
//! 2. Find the top-level group that took part in the match
//! 3. Look up that group's route slot and sub-group numbers in the pattern index
//! 4. Pick the handler for the request method from the route's method table
//! 5. Build a [`RouteRequest`] with positional and named parameters
//! 6. Run the handler; on error, run the error fallback
//!
//! ## Error Handling
//!
//! - No match: not-found fallback (default: plain-text 404)
//! - Handler error: error fallback (default: plain-text 500 with the message)
//! - Route matched, method has no handler: nothing runs, nothing is written
//!
//! Failures are reported once; the dispatcher never retries a handler.

mod core;
mod fallback;
mod request;

pub use core::{dispatch, handler, Dispatch, Handler, HandlerResult};
pub use fallback::{default_error, default_not_found, ErrorCallback, Fallbacks, NotFoundCallback};
pub use request::{
    Body, ParamVec, PositionalVec, Request, Response, RouteRequest, MAX_INLINE_PARAMS,
};
