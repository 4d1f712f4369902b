//! # pathtrie
//!
//! **pathtrie** maps URL path patterns to arbitrary payloads with a radix tree
//! per HTTP method, and resolves request paths to a payload plus the captured
//! path parameters.
//!
//! ## Overview
//!
//! - Static segments, `:name` segment parameters, `<name:regex>` constrained
//!   parameters and a trailing `*` wildcard
//! - Backtracking lookup: a failed branch never hides a later pattern that
//!   matches the whole path
//! - Zero-copy captures held in stack storage for up to
//!   [`router::MAX_INLINE_PARAMS`] parameters
//! - Route tables loaded from YAML or TOML, with hot reload
//!
//! ## Architecture
//!
//! - **[`router`]** - pattern tokenizer, radix tree, per-method [`router::Router`]
//! - **[`runtime_config`]** - [`runtime_config::RouterConfig`] and environment overrides
//! - **[`table`]** - route table files
//! - **[`hot_reload`]** - file watcher that swaps routers atomically
//! - **[`logging`]** - tracing subscriber setup for the binary
//! - **[`cli`]** - the `pathtrie` command line
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use pathtrie::router::Router;
//!
//! let mut router = Router::new();
//! router.get("/users/:id/posts/<post:[0-9]+>", "get_post").unwrap();
//!
//! let m = router.find(&Method::GET, "/users/ada/posts/12").unwrap();
//! assert_eq!(*m.payload, "get_post");
//! assert_eq!(m.get_path_param("id"), Some("ada"));
//! assert_eq!(m.get_path_param("post"), Some("12"));
//! ```

pub mod cli;
pub mod hot_reload;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod table;

pub use router::{ConfigError, RouteMatch, Router, SharedRouter};
pub use runtime_config::{MatchPriority, RouterConfig};
pub use table::{load_router, load_table, RouteTable};
