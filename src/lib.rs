//! # altrouter
//!
//! **altrouter** is a request router that matches paths against regular
//! expressions, merging every registered pattern into one combined alternation
//! so a request is matched in a single pass, then dispatching to the handler
//! registered for the request method.
//!
//! ## Overview
//!
//! Routes are registered as `(pattern, handlers by method)`. Each pattern is
//! wrapped in its own capturing group and appended to the combined pattern:
//!
//! ```text
//! (/blog/(\d+)/post/(\d+))|(/blog/(\d+))|(other)
//!  ^ group 1   ^2      ^3   ^4     ^5      ^6
//! ```
//!
//! After a match the router needs to know which route matched and which
//! capture numbers belong to it. A pattern index, rebuilt on every
//! registration, answers both: `1 -> route 0, [2, 3]`, `4 -> route 1, [5]`,
//! `6 -> route 2, []`.
//!
//! ## Architecture
//!
//! - **[`router`]** - Group flattening, the pattern index, the route registry
//!   and the public [`Router`]
//! - **[`dispatcher`]** - Match resolution, parameter extraction, handler
//!   invocation and the not-found / error fallbacks
//! - **[`method`]** - The nine recognized HTTP methods and per-route handler tables
//! - **[`runtime_config`]** - Router tuning from TOML and environment variables
//! - **[`route_table`]** - Route tables loaded from TOML
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Router
//!     participant Registry as RouteRegistry
//!     participant Dispatcher
//!     participant Handler
//!
//!     Caller->>Router: route(request, response)
//!     Router->>Registry: compiled matcher (compile if stale)
//!     Registry-->>Router: Arc<CompiledMatcher>
//!     Router->>Dispatcher: dispatch(matcher, request)
//!     Dispatcher->>Dispatcher: match combined pattern
//!     alt No match
//!         Dispatcher-->>Caller: not-found fallback (404)
//!     end
//!     Dispatcher->>Dispatcher: first non-empty top-level group
//!     Dispatcher->>Dispatcher: index -> route slot + sub-groups
//!     alt No handler for method
//!         Dispatcher-->>Caller: nothing written
//!     end
//!     Dispatcher->>Handler: handle(response, RouteRequest)
//!     alt Handler error
//!         Dispatcher-->>Caller: error fallback (500)
//!     end
//!     Handler-->>Caller: response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use altrouter::{handler, HandlersMap, Response, Router};
//!
//! let router = Router::new();
//!
//! let mut handlers = HandlersMap::new();
//! handlers.insert(
//!     "GET".to_string(),
//!     handler(|res, req| {
//!         let id = req.named_param("id").unwrap_or_default();
//!         res.write(format!("user {id}").as_bytes());
//!         Ok(())
//!     }),
//! );
//! router.register(r"^/user/(?P<id>\d+)$", handlers).unwrap();
//!
//! let mut res = Response::new();
//! let request = http::Request::get("/user/99").body(Vec::new()).unwrap();
//! router.route(request, &mut res).unwrap();
//! assert_eq!(res.body_text(), "user 99");
//! ```
//!
//! ## Concurrency
//!
//! Register routes during startup, then share the router (`Arc<Router>`)
//! across request threads. Routing holds a read lock only long enough to
//! clone the compiled matcher; matching and handlers run lock-free.
//! Registering while serving is safe but invalidates the matcher, and the
//! next request recompiles it.

pub mod cli;
pub mod dispatcher;
mod echo;
pub mod error;
pub mod ids;
pub mod logging;
pub mod method;
pub mod route_table;
pub mod router;
pub mod runtime_config;

pub use dispatcher::{
    handler, Dispatch, Handler, HandlerResult, Request, Response, RouteRequest,
};
pub use echo::echo_handler;
pub use error::RouterError;
pub use method::{HandlersMap, HttpMethod, MethodTable};
pub use router::{Router, RouterState};
pub use runtime_config::RouterConfig;
