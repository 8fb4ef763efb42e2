use {
    crate::{Error, Result, utils::contains_ignore_case},
    http::{HeaderName, Method},
    serde::Deserialize,
    std::{str::FromStr, time::Duration},
};

/// Cross-Origin Resource Sharing policy.
///
/// A router carries one optional global policy and every resource may carry
/// its own. At preflight time the resource policy is merged into the global
/// one with [`CorsPolicy::merge`]. Without a global policy CORS handling is
/// disabled entirely, whatever the resources declare.
///
/// An empty `allowed_methods` list means "whatever the resource registered".
/// An origin of `"*"` matches any origin.
///
/// # Examples
///
/// In TOML configuration:
/// ```toml
/// [router.cors]
/// allow_credentials = true
/// allowed_origins = ["https://app.example.com", "*"]
/// allowed_methods = ["GET", "POST"]
/// allowed_headers = ["Content-Type", "X-Api-Key"]
/// exposed_headers = ["X-Request-Id"]
/// max_age = "1h"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CorsPolicy {
    /// Origins allowed to make CORS requests. `"*"` matches any origin.
    pub allowed_origins: Vec<String>,

    /// Whether `Access-Control-Allow-Credentials: true` is sent. It is only
    /// sent when the request origin matched an entry exactly, never for `*`.
    pub allow_credentials: bool,

    /// Response headers exposed to the browser.
    pub exposed_headers: Vec<String>,

    /// How long browsers may cache a preflight response. Zero means the
    /// `Access-Control-Max-Age` header is not sent.
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,

    /// Methods allowed for cross-origin requests. When empty, the resource's
    /// registered methods are used instead.
    pub allowed_methods: Vec<String>,

    /// Request headers a cross-origin request may carry, compared
    /// case-insensitively.
    pub allowed_headers: Vec<String>,
}

impl CorsPolicy {
    /// Creates an empty policy that allows nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the origins allowed to make CORS requests.
    ///
    /// ```rust
    /// use route_trie::CorsPolicy;
    ///
    /// let cors = CorsPolicy::new()
    ///     .with_allowed_origins(["https://app.example.com", "*"]);
    /// assert_eq!(cors.allowed_origins.len(), 2);
    /// ```
    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Enables `Access-Control-Allow-Credentials` for exact origin matches.
    pub fn with_allow_credentials(mut self) -> Self {
        self.allow_credentials = true;
        self
    }

    /// Sets the headers exposed to the browser.
    pub fn with_exposed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exposed_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets how long browsers may cache a preflight response.
    ///
    /// ```rust
    /// use route_trie::CorsPolicy;
    /// use std::time::Duration;
    ///
    /// let cors = CorsPolicy::new().with_max_age(Duration::from_secs(3600));
    /// assert_eq!(cors.max_age.as_secs(), 3600);
    /// ```
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Sets the methods allowed for cross-origin requests.
    pub fn with_allowed_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the request headers a cross-origin request may carry.
    pub fn with_allowed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Merges `other` into a copy of `self`.
    ///
    /// - List fields are unioned, keeping the first occurrence of each value.
    ///   Origins and methods are compared exactly, header names
    ///   case-insensitively. Duplicates inside either list are dropped too.
    /// - `allow_credentials` is true if either side sets it.
    /// - `max_age` is taken from `other` when it is non-zero.
    ///
    /// Merging with `None` returns an unchanged copy.
    ///
    /// ```rust
    /// use route_trie::CorsPolicy;
    ///
    /// let global = CorsPolicy::new().with_allowed_methods(["GET"]);
    /// let local = CorsPolicy::new().with_allowed_methods(["POST", "POST", "GET"]);
    ///
    /// let merged = global.merge(Some(&local));
    /// assert_eq!(merged.allowed_methods, vec!["GET", "POST"]);
    /// ```
    pub fn merge(&self, other: Option<&CorsPolicy>) -> CorsPolicy {
        let Some(other) = other else {
            return self.clone();
        };

        CorsPolicy {
            allowed_origins: union(&self.allowed_origins, &other.allowed_origins, false),
            allow_credentials: self.allow_credentials || other.allow_credentials,
            exposed_headers: union(&self.exposed_headers, &other.exposed_headers, true),
            max_age: if other.max_age.is_zero() {
                self.max_age
            } else {
                other.max_age
            },
            allowed_methods: union(&self.allowed_methods, &other.allowed_methods, false),
            allowed_headers: union(&self.allowed_headers, &other.allowed_headers, true),
        }
    }

    /// Whether `"*"` appears among the allowed origins.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }

    /// Checks that every method and header name is a valid HTTP token.
    ///
    /// Credentials combined with a wildcard-only origin list are accepted,
    /// but produce a warning since the credentials header is never sent in
    /// that case.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_origins.iter().any(|origin| origin.trim().is_empty()) {
            return Err(Error::config("CORS allowed_origins must not contain blank entries"));
        }

        for method in &self.allowed_methods {
            Method::from_str(method).map_err(|_| {
                Error::config(format!("Invalid HTTP method in CORS allowed_methods: {method}"))
            })?;
        }

        for header in self.allowed_headers.iter().chain(&self.exposed_headers) {
            HeaderName::from_str(header).map_err(|_| {
                Error::config(format!("Invalid HTTP header name in CORS configuration: {header}"))
            })?;
        }

        if self.allow_credentials
            && !self.allowed_origins.is_empty()
            && self.allowed_origins.iter().all(|origin| origin == "*")
        {
            tracing::warn!(
                "CORS allow_credentials is set but only the wildcard origin is allowed; \
                 credentials will never be sent"
            );
        }

        Ok(())
    }
}

fn union(base: &[String], other: &[String], ignore_case: bool) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(base.len() + other.len());
    for value in base.iter().chain(other) {
        let seen = if ignore_case {
            contains_ignore_case(&merged, value)
        } else {
            merged.contains(value)
        };
        if !seen {
            merged.push(value.clone());
        }
    }
    merged
}
