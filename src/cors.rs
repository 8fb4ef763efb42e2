//! CORS response headers for preflight and actual requests.
//!
//! Both entry points take the effective policy, i.e. the global policy with
//! the resource policy merged in, and return the headers to add. A preflight
//! that fails on origin or method yields no CORS headers at all; the browser
//! then blocks the request on its own.

use {
    crate::{
        CorsPolicy,
        handler::{Handler, handler_fn},
        utils::{contains_ignore_case, split_list},
    },
    axum::body::Body,
    http::{
        HeaderMap, HeaderName, HeaderValue, Request, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
            ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ALLOW, ORIGIN,
        },
    },
};

/// Headers answering a preflight (`OPTIONS`) request.
///
/// `allowed_methods` is the resource's `Allow` value; it is used when the
/// policy lists no methods of its own.
pub fn preflight_headers(
    policy: &CorsPolicy,
    allowed_methods: &str,
    request: &HeaderMap,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let Some(origin) = match_origin(policy, request, &mut headers) else {
        return headers;
    };

    if let Some(requested) = header_str(request, &ACCESS_CONTROL_REQUEST_METHOD) {
        let granted: Vec<&str> = split_list(requested)
            .filter(|method| method_allowed(policy, allowed_methods, method))
            .collect();
        if granted.is_empty() {
            tracing::debug!(method = %requested, "CORS preflight method not allowed");
            return HeaderMap::new();
        }
        set(&mut headers, ACCESS_CONTROL_ALLOW_METHODS, &granted.join(", "));
    }

    common_headers(policy, origin, &mut headers);

    if !policy.max_age.is_zero() {
        set(
            &mut headers,
            ACCESS_CONTROL_MAX_AGE,
            &policy.max_age.as_secs().to_string(),
        );
    }

    if let Some(requested) = header_str(request, &ACCESS_CONTROL_REQUEST_HEADERS) {
        let requested: Vec<&str> = split_list(requested).collect();
        if requested
            .iter()
            .all(|header| contains_ignore_case(&policy.allowed_headers, header))
        {
            if !requested.is_empty() {
                set(&mut headers, ACCESS_CONTROL_ALLOW_HEADERS, &requested.join(", "));
            }
        } else {
            tracing::debug!(headers = ?requested, "CORS preflight headers not allowed");
        }
    }

    headers
}

/// Headers for an actual cross-origin request: origin, credentials and
/// exposed headers.
pub fn simple_request_headers(policy: &CorsPolicy, request: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(origin) = match_origin(policy, request, &mut headers) {
        common_headers(policy, origin, &mut headers);
    }
    headers
}

/// The synthesized `OPTIONS` handler: `Allow` plus, when CORS is enabled,
/// the preflight headers.
pub(crate) fn options(policy: Option<CorsPolicy>, allowed_methods: String) -> Handler {
    handler_fn(move |req: Request<Body>| {
        let mut headers = match &policy {
            Some(policy) => preflight_headers(policy, &allowed_methods, req.headers()),
            None => HeaderMap::new(),
        };
        set(&mut headers, ALLOW, &allowed_methods);
        async move { (StatusCode::OK, headers) }
    })
}

/// Adds the actual-request CORS headers to whatever `handler` returns,
/// without overriding headers it set itself.
pub(crate) fn with_cors(policy: CorsPolicy, handler: Handler) -> Handler {
    handler_fn(move |req: Request<Body>| {
        let cors_headers = simple_request_headers(&policy, req.headers());
        let response = handler.call(req);
        async move {
            let mut response = response.await;
            for (name, value) in &cors_headers {
                if !response.headers().contains_key(name) {
                    response.headers_mut().insert(name.clone(), value.clone());
                }
            }
            response
        }
    })
}

#[derive(Clone, Copy)]
enum OriginMatch {
    Exact,
    Any,
}

/// Sets `Access-Control-Allow-Origin` when the request origin is allowed.
fn match_origin(
    policy: &CorsPolicy,
    request: &HeaderMap,
    headers: &mut HeaderMap,
) -> Option<OriginMatch> {
    let origin = header_str(request, &ORIGIN).filter(|origin| !origin.is_empty())?;

    if policy.allowed_origins.iter().any(|allowed| allowed == origin) {
        set(headers, ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        Some(OriginMatch::Exact)
    } else if policy.allows_any_origin() {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        Some(OriginMatch::Any)
    } else {
        tracing::debug!(origin = %origin, "CORS origin not allowed");
        None
    }
}

fn common_headers(policy: &CorsPolicy, origin: OriginMatch, headers: &mut HeaderMap) {
    if policy.allow_credentials && matches!(origin, OriginMatch::Exact) {
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }
    if !policy.exposed_headers.is_empty() {
        set(
            headers,
            ACCESS_CONTROL_EXPOSE_HEADERS,
            &policy.exposed_headers.join(", "),
        );
    }
}

fn method_allowed(policy: &CorsPolicy, allowed_methods: &str, method: &str) -> bool {
    if policy.allowed_methods.is_empty() {
        split_list(allowed_methods).any(|allowed| allowed == method)
    } else {
        policy.allowed_methods.iter().any(|allowed| allowed == method)
    }
}

fn header_str<'h>(headers: &'h HeaderMap, name: &HeaderName) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn set(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::warn!(header = %name, value = %value, "Skipping invalid CORS header value"),
    }
}
