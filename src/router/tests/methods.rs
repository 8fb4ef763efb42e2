//! Method resolution: registered handlers, synthesized HEAD, TRACE and
//! OPTIONS, 405 and 404.

use super::{echo_method, get_body_string, request, request_with_body, send, text};
use crate::{CorsPolicy, Method, Outcome, Router, handler_fn};
use http::{
    StatusCode,
    header::{ALLOW, CONTENT_TYPE},
};

const VERBS: [&str; 7] = ["GET", "POST", "CONNECT", "DELETE", "PATCH", "PUT", "TRACE"];

#[tokio::test]
async fn test_method_specific_helpers() {
    let router = Router::new()
        .get("/test", echo_method())
        .post("/test", echo_method())
        .connect("/test", echo_method())
        .delete("/test", echo_method())
        .patch("/test", echo_method())
        .put("/test", echo_method())
        .trace("/test", echo_method())
        .into_service();

    for method in VERBS {
        let response = tower::ServiceExt::oneshot(router.clone(), request(method, "/test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{method}");
        assert_eq!(get_body_string(response).await, format!("success-{method}"));
    }
}

#[tokio::test]
async fn test_any_registers_six_methods() {
    let router = Router::new().any("/test", echo_method());
    let found = router.find("GET", "/test");
    assert_eq!(found.outcome(), Outcome::Handler);

    let service = router.into_service();
    for method in Method::ANY {
        let response = tower::ServiceExt::oneshot(service.clone(), request(method.as_str(), "/test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{method}");
        assert_eq!(get_body_string(response).await, format!("success-{method}"));
    }

    let response = tower::ServiceExt::oneshot(service, request("OPTIONS", "/test"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()[ALLOW],
        "CONNECT, DELETE, GET, PATCH, POST, PUT"
    );
}

#[tokio::test]
async fn test_head_uses_get_handler_without_body() {
    let router = Router::new().get(
        "/test",
        handler_fn(|_| async { ([("X-TestHeader", "true")], "some return body") }),
    );

    assert_eq!(router.find("HEAD", "/test").outcome(), Outcome::Head);
    let response = send(router, request("HEAD", "/test")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-testheader"], "true");
    assert_eq!(get_body_string(response).await, "");
}

#[tokio::test]
async fn test_registered_head_wins_over_get() {
    let router = Router::new()
        .get("/test", text("get"))
        .head("/test", handler_fn(|_| async { StatusCode::NO_CONTENT }));

    assert_eq!(router.find("HEAD", "/test").outcome(), Outcome::Handler);
    let response = send(router, request("HEAD", "/test")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[test]
fn test_head_without_get_is_not_allowed() {
    let router = Router::new().post("/test", text("post"));
    assert_eq!(
        router.find("HEAD", "/test").outcome(),
        Outcome::MethodNotAllowed
    );
}

#[tokio::test]
async fn test_trace_echoes_body_when_enabled() {
    let router = Router::new()
        .with_trace(true)
        .get("/test", text(""))
        .patch("/test/split", text(""))
        .connect("/test/split/again", text(""));

    let response = send(
        router,
        request_with_body("TRACE", "/test/split", "awesome trace"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "message/http");
    assert_eq!(get_body_string(response).await, "awesome trace");
}

#[tokio::test]
async fn test_trace_with_empty_body() {
    let router = Router::new().with_trace(true).patch("/test/split", text(""));
    let response = send(router, request("TRACE", "/test/split")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "message/http");
    assert_eq!(get_body_string(response).await, "");
}

#[tokio::test]
async fn test_trace_disabled_is_not_allowed() {
    let router = Router::new().get("/test", text(""));
    let response = send(router, request_with_body("TRACE", "/test", "secret")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET");
}

#[tokio::test]
async fn test_options_lists_allowed_methods() {
    let router = Router::new()
        .post("/test", text(""))
        .get("/test", text(""));

    let found = router.find("OPTIONS", "/test");
    assert_eq!(found.outcome(), Outcome::Options);
    assert_eq!(found.pattern(), Some("/test"));

    let response = send(router, request("OPTIONS", "/test")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[ALLOW], "POST, GET");
    assert!(!response.headers().contains_key("access-control-allow-origin"));
    assert_eq!(get_body_string(response).await, "");
}

#[tokio::test]
async fn test_method_not_allowed_lists_registered_methods() {
    let router = Router::new()
        .get("/test", text("some return body"))
        .put("/test", text("some return body"));

    let response = send(router, request("POST", "/test")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, PUT");
    assert_eq!(get_body_string(response).await, "Method Not Allowed");
}

#[tokio::test]
async fn test_reregistering_a_method_keeps_allow_unique() {
    let router = Router::new()
        .get("/test", text("first"))
        .post("/test", text("post"))
        .get("/test", text("second"));

    let response = send(router, request("PUT", "/test")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, POST");
}

#[tokio::test]
async fn test_unknown_method_token_is_not_allowed() {
    let router = Router::new().get("/test", text("some return body"));
    let found = router.find("FAKEMETHOD", "/test");
    assert_eq!(found.outcome(), Outcome::MethodNotAllowed);
    assert_eq!(found.pattern(), Some("/test"));

    let response = send(router, request("FAKEMETHOD", "/test")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(get_body_string(response).await, "Method Not Allowed");
}

#[test]
fn test_malformed_method_token_is_not_found() {
    let router = Router::new().get("/test", text(""));
    assert_eq!(router.find("GE T", "/test").outcome(), Outcome::NotFound);
    assert_eq!(router.find("", "/test").outcome(), Outcome::NotFound);
}

#[test]
fn test_policy_only_resource() {
    let router = Router::new()
        .with_global_cors(CorsPolicy::new().with_allowed_origins(["*"]))
        .cors("/open", CorsPolicy::new().with_allowed_headers(["X-Key"]));

    assert_eq!(router.find("GET", "/open").outcome(), Outcome::NotFound);
    let found = router.find("OPTIONS", "/open");
    assert_eq!(found.outcome(), Outcome::Options);
    assert_eq!(found.pattern(), None);
}

#[tokio::test]
async fn test_unmatched_path_is_not_found() {
    let router = Router::new().get("/users", text(""));
    let response = send(router, request("GET", "/files")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
