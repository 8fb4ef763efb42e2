//! Test helpers for `Router` unit tests.
//!
//! Requests go through `RouterService` with `oneshot()`, in process and
//! without network I/O. Real-server tests live in `tests/`.
//!
//! ## Available Helpers
//!
//! - Router builders: `create_test_router()`, `create_config_with_toml()`
//! - Request helpers: `request()`, `request_with_body()`, `options_request()`
//! - Response helpers: `send()`, `get_body_string()`
//! - Handlers: `text()`, `echo_method()`, `echo_param()`

use crate::{Config, Handler, Router, handler_fn, param};
use axum::{body::Body, http::Request, response::Response};
use tower::ServiceExt;

pub(crate) mod methods;

// ============================================================================
// Router Helpers
// ============================================================================

/// A router with TRACE enabled and no CORS, registering `GET` for every
/// pattern with a handler that answers the pattern itself.
pub(crate) fn create_test_router(patterns: &[&'static str]) -> Router {
    patterns
        .iter()
        .fold(Router::new().with_trace(true), |router, pattern| {
            router.get(pattern, text(*pattern))
        })
}

/// Parses a configuration from `toml`.
pub(crate) fn create_config_with_toml(toml: &str) -> Config {
    toml.parse().expect("Failed to parse test config TOML")
}

// ============================================================================
// Request Helpers
// ============================================================================

pub(crate) fn request(method: &str, uri: &str) -> Request<Body> {
    request_with_body(method, uri, Body::empty())
}

pub(crate) fn request_with_body(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

/// Creates an OPTIONS preflight request.
pub(crate) fn options_request(uri: &str, origin: &str, method: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .header("Origin", origin)
        .header("Access-Control-Request-Method", method)
        .body(Body::empty())
        .unwrap()
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Sends `req` through a fresh `RouterService` wrapping `router`.
pub(crate) async fn send(router: Router, req: Request<Body>) -> Response {
    router.into_service().oneshot(req).await.unwrap()
}

pub(crate) async fn get_body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}

// ============================================================================
// Test Handlers
// ============================================================================

pub(crate) fn text(body: &'static str) -> Handler {
    handler_fn(move |_| async move { body })
}

/// Answers `success-<METHOD>`.
pub(crate) fn echo_method() -> Handler {
    handler_fn(|req: Request<Body>| async move { format!("success-{}", req.method()) })
}

/// Answers `<name>=<value>` for the bound parameter `name`.
pub(crate) fn echo_param(name: &'static str) -> Handler {
    handler_fn(move |req: Request<Body>| async move { format!("{name}={}", param(&req, name)) })
}
