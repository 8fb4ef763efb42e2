//! Path parameters bound during a lookup.
//!
//! [`Router::dispatch`](crate::Router::dispatch) stores a [`Params`] value and
//! the [`MatchedPattern`] in the request extensions before the handler runs.

use {
    http::Request,
    std::{ops::Range, sync::Arc},
};

/// Name of the parameter that receives the remainder of the path matched by
/// a `*` wildcard.
pub const WILDCARD_PARAM: &str = "_name";

/// Ordered `name -> value` pairs captured from the request path.
///
/// ```rust
/// use route_trie::Params;
///
/// let mut params = Params::new();
/// params.insert("id", "42");
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zips `names` with the captured byte ranges of `path`, in order.
    pub(crate) fn bind(names: &[String], path: &str, captures: &[Range<usize>]) -> Self {
        let entries = names
            .iter()
            .zip(captures)
            .map(|(name, range)| (name.clone(), path[range.clone()].to_string()))
            .collect();
        Self { entries }
    }

    /// The value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Binds `name` to `value`, replacing an existing binding.
    ///
    /// Middleware can use this to hand extra values to the handler.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Parameter names in the order they appear in the pattern.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The route pattern a request matched, e.g. `/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPattern(pub(crate) Arc<str>);

impl MatchedPattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The value of path parameter `name`, or `""` when the request has no such
/// parameter.
///
/// ```rust
/// use axum::body::Body;
/// use http::Request;
/// use route_trie::{Params, param};
///
/// let mut params = Params::new();
/// params.insert("name", "world");
/// let mut req = Request::new(Body::empty());
/// req.extensions_mut().insert(params);
///
/// assert_eq!(param(&req, "name"), "world");
/// assert_eq!(param(&req, "other"), "");
/// ```
pub fn param<'r, B>(req: &'r Request<B>, name: &str) -> &'r str {
    req.extensions()
        .get::<Params>()
        .and_then(|params| params.get(name))
        .unwrap_or("")
}

/// Names of the path parameters bound for this request.
pub fn param_names<B>(req: &Request<B>) -> Vec<&str> {
    req.extensions()
        .get::<Params>()
        .map(|params| params.names().collect())
        .unwrap_or_default()
}

/// The pattern this request was routed through, if any.
pub fn matched_pattern<B>(req: &Request<B>) -> Option<&str> {
    req.extensions()
        .get::<MatchedPattern>()
        .map(MatchedPattern::as_str)
}
