//! Integration tests against a real server.
//!
//! Each test binds a random port, serves a `Router` with a shutdown channel
//! and talks to it over HTTP with `reqwest`.
//!
//! ## Test Coverage
//!
//! - `test_params_over_the_wire`: Path parameters reach the handler
//! - `test_synthesized_responses`: HEAD, OPTIONS, 405 and 404 on a live server
//! - `test_preflight_from_config`: The `[router.cors]` section drives preflight answers
//! - `test_graceful_shutdown`: The server stops when the shutdown future completes

use reqwest::{Client, Method, StatusCode};
use route_trie::{Body, Config, CorsPolicy, Router, handler_fn, param};
use std::{net::SocketAddr, time::Duration};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<route_trie::Result<()>>,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(mut self) -> route_trie::Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.await.expect("Server task panicked")
    }
}

/// Start a test server for `router` on a random port.
async fn start_test_server(router: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        router
            .serve_with_shutdown(listener, async move {
                let _ = rx.await;
            })
            .await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown: Some(tx),
        handle,
    }
}

fn test_router() -> Router {
    Router::new()
        .get(
            "/users/:id",
            handler_fn(|req: http::Request<Body>| async move {
                format!("user {}", param(&req, "id"))
            }),
        )
        .post("/users", handler_fn(|_| async { (http::StatusCode::CREATED, "created") }))
        .get(
            "/static/*",
            handler_fn(|req: http::Request<Body>| async move {
                format!("file {}", param(&req, "_name"))
            }),
        )
}

#[tokio::test]
async fn test_params_over_the_wire() {
    let server = start_test_server(test_router()).await;
    let client = Client::new();

    let response = client.get(server.url("/users/42")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "user 42");

    let response = client
        .get(server.url("/static/css/site.css"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "file css/site.css");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_synthesized_responses() {
    let server = start_test_server(test_router()).await;
    let client = Client::new();

    let response = client.head(server.url("/users/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .request(Method::OPTIONS, server.url("/users"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["allow"], "POST");

    let response = client.delete(server.url("/users")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "POST");
    assert_eq!(response.text().await.unwrap(), "Method Not Allowed");

    let response = client.get(server.url("/missing")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "Not Found");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_preflight_from_config() {
    let config = Config::from_toml_file("test").expect("Failed to load config/test.toml");
    let router = Router::from_config(&config)
        .unwrap()
        .put("/items/:id", handler_fn(|_| async { "updated" }))
        .cors(
            "/items/:id",
            CorsPolicy::new().with_allowed_headers(["X-Api-Key"]),
        );
    let server = start_test_server(router).await;
    let client = Client::new();

    let response = client
        .request(Method::OPTIONS, server.url("/items/9"))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "PUT")
        .header("Access-Control-Request-Headers", "content-type, x-api-key")
        .send()
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        headers["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert_eq!(headers["access-control-allow-methods"], "PUT");
    assert_eq!(
        headers["access-control-allow-headers"],
        "content-type, x-api-key"
    );
    assert_eq!(headers["access-control-max-age"], "3600");

    let response = client
        .request(Method::TRACE, server.url("/items/9"))
        .body("echo me")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "echo me");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let server = start_test_server(test_router()).await;
    let addr = server.addr;

    server.stop().await.unwrap();

    let result = Client::new()
        .get(format!("http://{addr}/users/1"))
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(result.is_err());
}
