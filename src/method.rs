//! HTTP method tokens and the per-resource method table.

use {
    crate::{CorsPolicy, Error, Handler, Result},
    std::{fmt, str::FromStr, sync::Arc},
};

/// One of the nine standard HTTP methods.
///
/// Parsing is case-sensitive: `"get"` is not `GET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// All standard methods, in alphabetical order.
    pub const ALL: [Method; 9] = [
        Method::Connect,
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Put,
        Method::Trace,
    ];

    /// The methods [`Router::any`](crate::Router::any) registers. HEAD,
    /// OPTIONS and TRACE are left to their synthesized handlers.
    pub const ANY: [Method; 6] = [
        Method::Connect,
        Method::Delete,
        Method::Get,
        Method::Patch,
        Method::Post,
        Method::Put,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Connect => "CONNECT",
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Trace => "TRACE",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| Error::invalid_method(s))
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = Error;

    fn try_from(method: &http::Method) -> Result<Self> {
        method.as_str().parse()
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Connect => http::Method::CONNECT,
            Method::Delete => http::Method::DELETE,
            Method::Get => http::Method::GET,
            Method::Head => http::Method::HEAD,
            Method::Options => http::Method::OPTIONS,
            Method::Patch => http::Method::PATCH,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Trace => http::Method::TRACE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered handler together with what is needed to bind its parameters.
///
/// Parameter names live here rather than only on the tree node so that two
/// methods on the same node can name their parameters differently.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    pub(crate) handler: Handler,
    pub(crate) param_names: Arc<[String]>,
    pub(crate) pattern: Arc<str>,
}

/// Handlers registered on one resource, keyed by method.
///
/// Keeps the `Allow` header value up to date as handlers are added: methods
/// appear in registration order, joined by `", "`, each at most once.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    endpoints: [Option<Endpoint>; 9],
    allowed_methods: String,
    cors: Option<CorsPolicy>,
}

impl MethodTable {
    /// Registers (or replaces) the endpoint for `method`.
    pub(crate) fn insert(&mut self, method: Method, endpoint: Endpoint) {
        if self.endpoints[method.index()].replace(endpoint).is_none() {
            if !self.allowed_methods.is_empty() {
                self.allowed_methods.push_str(", ");
            }
            self.allowed_methods.push_str(method.as_str());
        }
    }

    pub(crate) fn get(&self, method: Method) -> Option<&Endpoint> {
        self.endpoints[method.index()].as_ref()
    }

    /// Whether a handler is registered for `method`.
    pub fn contains(&self, method: Method) -> bool {
        self.endpoints[method.index()].is_some()
    }

    /// The `Allow` header value, e.g. `"GET, POST"`.
    pub fn allowed_methods(&self) -> &str {
        &self.allowed_methods
    }

    /// True when no method has a handler (the resource only carries a policy).
    pub fn is_empty(&self) -> bool {
        self.allowed_methods.is_empty()
    }

    /// Registered methods in alphabetical order.
    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL.into_iter().filter(|method| self.contains(*method))
    }

    /// The resource-level CORS policy accumulated so far.
    pub fn cors(&self) -> Option<&CorsPolicy> {
        self.cors.as_ref()
    }

    /// Merges `policy` into the resource-level policy.
    pub(crate) fn merge_cors(&mut self, policy: &CorsPolicy) {
        self.cors = Some(match &self.cors {
            Some(existing) => existing.merge(Some(policy)),
            None => policy.clone(),
        });
    }
}
