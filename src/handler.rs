//! Request handlers, middleware, and the handlers the router synthesizes
//! when no registered one applies.

use {
    axum::{
        body::{Body, Bytes},
        response::{IntoResponse, Response},
    },
    http::{
        HeaderValue, Request, StatusCode,
        header::{ALLOW, CONTENT_TYPE},
    },
    http_body_util::BodyExt,
    std::{fmt, future::Future, pin::Pin, sync::Arc},
};

/// The boxed future a [`Handler`] returns.
pub type BoxResponseFuture = Pin<Box<dyn Future<Output = Response<Body>> + Send + 'static>>;

type HandlerFn = dyn Fn(Request<Body>) -> BoxResponseFuture + Send + Sync + 'static;

/// A cloneable async request handler.
///
/// Build one with [`handler_fn`] from any async closure whose output
/// implements [`IntoResponse`].
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        Self {
            inner: Arc::new(move |req| {
                let fut = f(req);
                Box::pin(async move { fut.await.into_response() })
            }),
        }
    }

    /// Runs the handler.
    pub fn call(&self, req: Request<Body>) -> BoxResponseFuture {
        (self.inner)(req)
    }

    /// Whether both values wrap the same function.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// Builds a [`Handler`] from an async closure.
///
/// ```rust
/// use route_trie::{handler_fn, param};
///
/// let hello = handler_fn(|req| async move {
///     format!("Hello, {}!", param(&req, "name"))
/// });
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> Handler
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Handler::new(f)
}

/// A function that wraps a [`Handler`] in another one.
///
/// The wrapper decides whether and when the inner handler runs, so it can
/// act before, after, or instead of it.
#[derive(Clone)]
pub struct Middleware {
    inner: Arc<dyn Fn(Handler) -> Handler + Send + Sync + 'static>,
}

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn wrap(&self, handler: Handler) -> Handler {
        (self.inner)(handler)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// Builds a [`Middleware`] from a closure.
///
/// ```rust
/// use route_trie::{Handler, handler_fn, middleware_fn};
///
/// let logged = middleware_fn(|next: Handler| {
///     handler_fn(move |req| {
///         let next = next.clone();
///         async move {
///             tracing::info!(path = %req.uri().path(), "before");
///             next.call(req).await
///         }
///     })
/// });
/// ```
pub fn middleware_fn<F>(f: F) -> Middleware
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    Middleware::new(f)
}

/// Wraps `handler` so that `middleware[0]` is the outermost layer.
pub(crate) fn chain(handler: Handler, middleware: &[Middleware]) -> Handler {
    middleware
        .iter()
        .rev()
        .fold(handler, |inner, layer| layer.wrap(inner))
}

// ============================================================================
// Synthesized handlers
// ============================================================================

/// 404 with a plain-text body.
pub(crate) fn not_found() -> Handler {
    handler_fn(|_| async { (StatusCode::NOT_FOUND, "Not Found") })
}

/// 405 advertising the resource's registered methods.
pub(crate) fn method_not_allowed(allowed: String) -> Handler {
    handler_fn(move |_| {
        let allowed = allowed.clone();
        async move {
            (
                StatusCode::METHOD_NOT_ALLOWED,
                [(ALLOW, allowed)],
                "Method Not Allowed",
            )
        }
    })
}

/// Runs the GET handler and drops its body, keeping status and headers.
pub(crate) fn head(get: Handler) -> Handler {
    handler_fn(move |req| {
        let get = get.clone();
        async move {
            let (parts, _) = get.call(req).await.into_parts();
            Response::from_parts(parts, Body::empty())
        }
    })
}

/// Echoes the request body back as `message/http`.
pub(crate) fn trace() -> Handler {
    handler_fn(|req: Request<Body>| async move {
        let body = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read TRACE request body");
                Bytes::new()
            }
        };
        (
            [(CONTENT_TYPE, HeaderValue::from_static("message/http"))],
            body,
        )
    })
}
