//! # route-trie
//!
//! A radix-tree HTTP router for Axum and Tower.
//!
//! Routes are byte-prefix patterns with `:name` segment parameters and a
//! trailing `*` wildcard. Lookup prefers static segments over parameters
//! over wildcards, and retries the dynamic branch when a static branch
//! dead-ends. Every lookup resolves to a handler: the registered one, a
//! synthesized `HEAD`, `OPTIONS` or `TRACE` response, a `405` with an
//! `Allow` header, or the not-found handler.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use route_trie::{Config, Result, Router, handler_fn, param};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_rust_env().unwrap_or_default();
//!     config.setup_tracing();
//!
//!     let listener = tokio::net::TcpListener::bind(config.http.socket_addr()?).await?;
//!
//!     Router::from_config(&config)?
//!         .get("/", handler_fn(|_| async { "Hello, World!" }))
//!         .get("/users/:id", handler_fn(|req| async move {
//!             format!("user {}", param(&req, "id"))
//!         }))
//!         .serve(listener)
//!         .await
//! }
//! ```
//!
//! # Patterns
//!
//! | Pattern | Matches | Parameters |
//! |---------|---------|------------|
//! | `/users/new` | `/users/new` only | none |
//! | `/users/:id` | `/users/42` | `id = "42"` |
//! | `/v:version/hi` | `/v1/hi` | `version = "1"` |
//! | `/static/*` | `/static/css/site.css` | `_name = "css/site.css"` |
//!
//! # CORS
//!
//! A global [`CorsPolicy`] turns CORS handling on. Per-resource policies are
//! merged into it. Preflight requests are answered by the synthesized
//! `OPTIONS` handler; actual requests get `Access-Control-Allow-Origin`,
//! credentials and exposed headers added to the handler's response.
//!
//! ```rust
//! use route_trie::{CorsPolicy, Router, handler_fn};
//!
//! let router = Router::new()
//!     .with_global_cors(CorsPolicy::new().with_allowed_origins(["https://app.example.com"]))
//!     .get("/items", handler_fn(|_| async { "items" }))
//!     .cors("/items", CorsPolicy::new().with_allowed_headers(["X-Api-Key"]));
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration loading and validation ([`Config`], [`CorsPolicy`]) |
//! | [`router`] | Registration and resolution ([`Router`], [`RouteMatch`]) |
//! | [`handler`] | [`Handler`] and [`Middleware`] |
//! | [`cors`] | Preflight and actual-request CORS headers |
//! | [`params`] | Path parameters ([`Params`], [`param`]) |
//! | [`error`] | Error types ([`Error`], [`ErrorKind`]) |

pub mod config;
pub mod cors;
pub mod error;
pub mod handler;
pub mod method;
pub mod params;
pub mod router;
mod tree;
mod utils;

pub use axum::body::Body;
pub use config::*;
pub use error::{Error, ErrorKind};
pub use handler::{BoxResponseFuture, Handler, Middleware, handler_fn, middleware_fn};
pub use method::{Method, MethodTable};
pub use params::{MatchedPattern, Params, WILDCARD_PARAM, matched_pattern, param, param_names};
pub use router::{Outcome, RouteMatch, Router, RouterService};
pub use utils::replace_handlebars_with_env;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
