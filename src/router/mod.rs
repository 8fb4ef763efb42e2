//! The [`Router`]: route registration and request resolution.
//!
//! Resolution always produces a handler. In order of preference:
//!
//! 1. the handler registered for the exact method,
//! 2. for `HEAD`, the `GET` handler with its body dropped,
//! 3. for `TRACE` (when enabled), an echo of the request body,
//! 4. for `OPTIONS`, an `Allow` response carrying the CORS preflight headers,
//! 5. `405 Method Not Allowed` when the resource exists,
//! 6. the not-found handler otherwise.

mod service;

#[cfg(test)]
mod tests;

pub use service::RouterService;

use {
    crate::{
        Config, CorsPolicy, Error, Result, cors,
        handler::{self, BoxResponseFuture, Handler, Middleware},
        method::{Endpoint, Method, MethodTable},
        params::{MatchedPattern, Params},
        tree::Trie,
    },
    axum::body::Body,
    http::Request,
    std::{fmt, sync::Arc, sync::OnceLock},
};

/// How a request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A handler registered for the request method.
    Handler,
    /// The `GET` handler answering a `HEAD` request.
    Head,
    /// The synthesized `TRACE` echo.
    Trace,
    /// The synthesized `OPTIONS` / preflight response.
    Options,
    /// The resource exists but not for this method.
    MethodNotAllowed,
    /// No resource matches the path.
    NotFound,
}

/// The result of [`Router::find`].
#[derive(Debug, Clone)]
pub struct RouteMatch {
    handler: Handler,
    params: Params,
    pattern: Option<Arc<str>>,
    outcome: Outcome,
}

impl RouteMatch {
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The registered pattern that matched, e.g. `/users/:id`.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn into_handler(self) -> Handler {
        self.handler
    }
}

/// A radix-tree HTTP router.
///
/// ```rust
/// use route_trie::{Outcome, Router, handler_fn};
///
/// let router = Router::new()
///     .get("/users/:id", handler_fn(|_| async { "user" }))
///     .post("/users", handler_fn(|_| async { "created" }));
///
/// let found = router.find("GET", "/users/42");
/// assert_eq!(found.outcome(), Outcome::Handler);
/// assert_eq!(found.params().get("id"), Some("42"));
/// assert_eq!(found.pattern(), Some("/users/:id"));
///
/// assert_eq!(router.find("DELETE", "/users").outcome(), Outcome::MethodNotAllowed);
/// assert_eq!(router.find("GET", "/nope").outcome(), Outcome::NotFound);
/// ```
#[derive(Debug, Default)]
pub struct Router {
    trie: Trie,
    global_cors: Option<CorsPolicy>,
    allow_trace: bool,
    not_found: OnceLock<Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router with the TRACE setting and global CORS policy from
    /// `config.router`, after validating them.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.router.validate()?;
        Ok(Self {
            global_cors: config.router.cors.clone(),
            allow_trace: config.router.allow_trace,
            ..Self::default()
        })
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers `handler` for `method` on `pattern`.
    ///
    /// `middleware` wraps the handler, the first entry outermost. `cors` is
    /// merged into the resource's policy. Registering the same method and
    /// pattern again replaces the handler.
    pub fn register(
        &mut self,
        method: &str,
        pattern: &str,
        handler: Handler,
        cors: Option<CorsPolicy>,
        middleware: &[Middleware],
    ) -> Result<()> {
        let method: Method = method.parse()?;
        let handler = handler::chain(handler, middleware);
        self.trie.add(pattern, Some((method, handler)), cors.as_ref())?;
        tracing::debug!(
            method = %method,
            pattern = %pattern,
            cors = cors.is_some(),
            middleware = middleware.len(),
            "Route registered"
        );
        Ok(())
    }

    /// Attaches a CORS policy to `pattern` without registering a method.
    pub fn set_cors(&mut self, pattern: &str, policy: CorsPolicy) -> Result<()> {
        self.trie.add(pattern, None, Some(&policy))?;
        tracing::debug!(pattern = %pattern, "CORS policy registered");
        Ok(())
    }

    /// Replaces the default 404 handler. Only the first call takes effect.
    pub fn set_not_found(&self, handler: Handler) -> Result<()> {
        self.not_found.set(handler).map_err(|_| {
            tracing::warn!("Not-found handler already set, ignoring replacement");
            Error::config("The not-found handler can only be set once")
        })
    }

    /// Registers `handler` for `method` on `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if the method is not a standard HTTP method or the pattern is
    /// invalid. Use [`Router::register`] to handle these as errors.
    pub fn route(self, method: &str, pattern: &str, handler: Handler) -> Self {
        self.route_with(method, pattern, handler, None, &[])
    }

    /// Like [`Router::route`], also merging `cors` into the resource policy.
    pub fn route_with_cors(
        self,
        method: &str,
        pattern: &str,
        handler: Handler,
        cors: CorsPolicy,
    ) -> Self {
        self.route_with(method, pattern, handler, Some(cors), &[])
    }

    /// Like [`Router::route`], wrapping `handler` in `middleware`.
    pub fn route_with_middleware(
        self,
        method: &str,
        pattern: &str,
        handler: Handler,
        middleware: &[Middleware],
    ) -> Self {
        self.route_with(method, pattern, handler, None, middleware)
    }

    fn route_with(
        mut self,
        method: &str,
        pattern: &str,
        handler: Handler,
        cors: Option<CorsPolicy>,
        middleware: &[Middleware],
    ) -> Self {
        if let Err(err) = self.register(method, pattern, handler, cors, middleware) {
            panic!("{err}");
        }
        self
    }

    pub fn connect(self, pattern: &str, handler: Handler) -> Self {
        self.route("CONNECT", pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: Handler) -> Self {
        self.route("DELETE", pattern, handler)
    }

    pub fn get(self, pattern: &str, handler: Handler) -> Self {
        self.route("GET", pattern, handler)
    }

    pub fn head(self, pattern: &str, handler: Handler) -> Self {
        self.route("HEAD", pattern, handler)
    }

    pub fn options(self, pattern: &str, handler: Handler) -> Self {
        self.route("OPTIONS", pattern, handler)
    }

    pub fn patch(self, pattern: &str, handler: Handler) -> Self {
        self.route("PATCH", pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: Handler) -> Self {
        self.route("POST", pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: Handler) -> Self {
        self.route("PUT", pattern, handler)
    }

    pub fn trace(self, pattern: &str, handler: Handler) -> Self {
        self.route("TRACE", pattern, handler)
    }

    /// Registers `handler` for CONNECT, DELETE, GET, PATCH, POST and PUT.
    pub fn any(self, pattern: &str, handler: Handler) -> Self {
        Method::ANY.into_iter().fold(self, |router, method| {
            router.route(method.as_str(), pattern, handler.clone())
        })
    }

    /// Attaches a CORS policy to `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is invalid.
    pub fn cors(mut self, pattern: &str, policy: CorsPolicy) -> Self {
        if let Err(err) = self.set_cors(pattern, policy) {
            panic!("{err}");
        }
        self
    }

    /// Sets the global CORS policy. Without one, CORS handling is off.
    pub fn with_global_cors(mut self, policy: CorsPolicy) -> Self {
        self.global_cors = Some(policy);
        self
    }

    /// Enables or disables the synthesized TRACE echo.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.allow_trace = enabled;
        self
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolves `method` and `path` to a handler and its bound parameters.
    pub fn find(&self, method: &str, path: &str) -> RouteMatch {
        let found = self.resolve(method, path);
        tracing::trace!(
            method = %method,
            path = %path,
            outcome = ?found.outcome,
            pattern = ?found.pattern,
            "Route resolved"
        );
        found
    }

    /// Resolves the request, stores [`Params`] and [`MatchedPattern`] in its
    /// extensions and runs the handler.
    pub fn dispatch(&self, mut req: Request<Body>) -> BoxResponseFuture {
        let RouteMatch {
            handler,
            params,
            pattern,
            ..
        } = self.find(req.method().as_str(), req.uri().path());

        req.extensions_mut().insert(params);
        if let Some(pattern) = pattern {
            req.extensions_mut().insert(MatchedPattern(pattern));
        }
        handler.call(req)
    }

    /// The pattern `path` would be routed through for `method`, if any.
    pub fn matched_pattern(&self, method: &str, path: &str) -> Option<String> {
        self.find(method, path).pattern.map(|pattern| pattern.to_string())
    }

    fn resolve(&self, method: &str, path: &str) -> RouteMatch {
        let mut captures = Vec::new();
        let Some(node) = self.trie.find(path, &mut captures) else {
            return self.not_found_match();
        };
        let Some(table) = node.table.as_ref() else {
            return self.not_found_match();
        };
        if http::Method::from_bytes(method.as_bytes()).is_err() {
            return self.not_found_match();
        }

        let method = method.parse::<Method>().ok();
        let matched = |endpoint: &Endpoint, handler: Handler, outcome: Outcome| RouteMatch {
            handler,
            params: Params::bind(&endpoint.param_names, path, &captures),
            pattern: Some(endpoint.pattern.clone()),
            outcome,
        };

        if let Some(endpoint) = method.and_then(|method| table.get(method)) {
            let handler = self.with_cors(table, endpoint.handler.clone());
            return matched(endpoint, handler, Outcome::Handler);
        }

        if method == Some(Method::Head)
            && let Some(get) = table.get(Method::Get)
        {
            let handler = self.with_cors(table, handler::head(get.handler.clone()));
            return matched(get, handler, Outcome::Head);
        }

        let synthesized = |handler: Handler, outcome: Outcome| RouteMatch {
            handler,
            params: Params::bind(&node.param_names, path, &captures),
            pattern: first_pattern(table),
            outcome,
        };

        match method {
            Some(Method::Trace) if self.allow_trace => {
                synthesized(handler::trace(), Outcome::Trace)
            }
            Some(Method::Options) => synthesized(
                cors::options(
                    self.effective_cors(table),
                    table.allowed_methods().to_string(),
                ),
                Outcome::Options,
            ),
            _ if table.is_empty() => self.not_found_match(),
            _ => synthesized(
                handler::method_not_allowed(table.allowed_methods().to_string()),
                Outcome::MethodNotAllowed,
            ),
        }
    }

    fn not_found_match(&self) -> RouteMatch {
        RouteMatch {
            handler: self
                .not_found
                .get()
                .cloned()
                .unwrap_or_else(handler::not_found),
            params: Params::default(),
            pattern: None,
            outcome: Outcome::NotFound,
        }
    }

    /// The global policy with the resource policy merged in, when CORS is on.
    fn effective_cors(&self, table: &MethodTable) -> Option<CorsPolicy> {
        self.global_cors
            .as_ref()
            .map(|global| global.merge(table.cors()))
    }

    fn with_cors(&self, table: &MethodTable, handler: Handler) -> Handler {
        match self.effective_cors(table) {
            Some(policy) => cors::with_cors(policy, handler),
            None => handler,
        }
    }
}

fn first_pattern(table: &MethodTable) -> Option<Arc<str>> {
    table
        .methods()
        .find_map(|method| table.get(method))
        .map(|endpoint| endpoint.pattern.clone())
}

/// Renders the routing tree, one node per line.
impl fmt::Display for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.trie, f)
    }
}
