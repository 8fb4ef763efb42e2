//! Hello World Example
//!
//! A small API on route-trie with path parameters, a catch-all and CORS.
//!
//! Run with:
//! ```bash
//! cargo run --example hello_world
//! ```
//!
//! Then test:
//! ```bash
//! curl http://localhost:3000/
//! curl http://localhost:3000/users/42
//! curl http://localhost:3000/files/docs/readme.md
//! curl -i -X DELETE http://localhost:3000/users/42
//! curl -i -X OPTIONS -H "Origin: http://localhost:5173" \
//!      -H "Access-Control-Request-Method: PUT" http://localhost:3000/users/42
//! ```

use axum::{Json, http::StatusCode};
use route_trie::{Body, Config, Handler, Result, Router, handler_fn, middleware_fn, param};
use serde::Serialize;

#[derive(Serialize)]
struct User {
    id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from inline string
    // In production, use Config::from_rust_env() to load from config/{RUST_ENV}.toml
    let config: Config = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000

[router]
allow_trace = false

[router.cors]
allowed_origins = ["http://localhost:5173"]
allowed_headers = ["content-type"]
max_age = "10m"

[logging]
format = "default"
level = "route_trie=debug,info"
"#
    .parse()?;

    config.setup_tracing();

    let timed = middleware_fn(|next: Handler| {
        handler_fn(move |req: axum::http::Request<Body>| {
            let next = next.clone();
            async move {
                let started = std::time::Instant::now();
                let path = req.uri().path().to_string();
                let response = next.call(req).await;
                tracing::info!(path = %path, elapsed = ?started.elapsed(), "Request served");
                response
            }
        })
    });

    let router = Router::from_config(&config)?
        .get("/", handler_fn(|_| async { "Hello, World!" }))
        .route_with_middleware(
            "GET",
            "/users/:id",
            handler_fn(|req: axum::http::Request<Body>| async move {
                Json(User {
                    id: param(&req, "id").to_string(),
                })
            }),
            &[timed],
        )
        .put("/users/:id", handler_fn(|_| async { StatusCode::NO_CONTENT }))
        .get(
            "/files/*",
            handler_fn(|req: axum::http::Request<Body>| async move {
                format!("serving {}\n", param(&req, "_name"))
            }),
        );

    tracing::debug!("Routing tree:\n{router}");

    let listener = tokio::net::TcpListener::bind(config.http.socket_addr()?).await?;
    router.serve(listener).await
}
