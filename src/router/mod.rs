//! # Router Module
//!
//! The router module maps URL path patterns to opaque payloads and resolves
//! request paths back to a payload plus the captured parameter values.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing route patterns (`/users/:id`, `/items/<id:[0-9]+>`, `/files/*`)
//! - Building one radix tree per HTTP method at startup
//! - Matching incoming request paths, with backtracking across overlapping patterns
//! - Extracting path parameters without copying them out of the request path
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Registration**: At startup, each `(method, pattern, payload)` triple is
//!    tokenized, its constraints are compiled, and the pattern is inserted into the
//!    [`Store`] for its method. Errors surface here as [`ConfigError`].
//!
//! 2. **Matching**: For each incoming request, [`Router::find`] walks the tree for
//!    the request method once. Time is proportional to the path length and to the
//!    local branching at parametric nodes, not to the number of routes.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use pathtrie::router::Router;
//!
//! let mut router = Router::new();
//! router.get("/users/:id", "get_user").unwrap();
//! router.get("/users/new", "new_user_form").unwrap();
//! router.get("/items/<id:[0-9]+>", "get_item").unwrap();
//! router.get("/files/*", "serve_file").unwrap();
//!
//! let m = router.find(&Method::GET, "/users/new").unwrap();
//! assert_eq!(*m.payload, "new_user_form");
//!
//! let m = router.find(&Method::GET, "/files/css/site.css").unwrap();
//! assert_eq!(m.get_path_param("*"), Some("css/site.css"));
//!
//! assert!(router.find(&Method::GET, "/items/abc").is_none());
//! ```
//!
//! ## Concurrency
//!
//! Registration takes `&mut self` and lookups take `&self`, so the borrow checker
//! enforces the build-then-serve discipline. To change routes while serving,
//! build a new [`Router`] and swap it into a [`SharedRouter`].

mod constraint;
mod core;
mod error;
mod pattern;
mod radix;
mod shared;
mod store;

pub use constraint::{AnchoredRegex, ConstraintCompiler, ParamMatcher, RegexCompiler};
pub use core::{ParamValues, ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use error::ConfigError;
pub use pattern::PatternSyntax;
pub use shared::SharedRouter;
pub use store::{Found, Store};
