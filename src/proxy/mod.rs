//! Same-origin forwarding proxy: relays any request under `/api/proxy/*` to
//! the configured backend origin and streams the response back verbatim, so
//! the browser never has to make a cross-origin call.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use url::Url;

use crate::config::AppConfig;
use crate::envelope::{Envelope, ErrorEnvelope};

/// Hop-by-hop headers that are connection-specific and would corrupt the
/// proxied transport if forwarded. Header names are compared lowercase;
/// `HeaderName` normalizes casing on the way in.
pub const HOP_BY_HOP_HEADERS: [&str; 4] = [
    "connection",
    "content-length",
    "transfer-encoding",
    "accept-encoding",
];

#[derive(Clone)]
pub struct ProxyState {
    config: Arc<AppConfig>,
    http: reqwest::Client,
    /// Backend origin pre-validated as a header value for the CORS response.
    allow_origin: HeaderValue,
}

impl ProxyState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        // Manual redirect mode: 3xx responses (and their Location/Set-Cookie
        // semantics) must pass through to the browser untouched. No cookie
        // store either; the proxy relays cookies byte-for-byte, it never
        // owns them.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("proxy http client");
        let allow_origin = HeaderValue::from_str(&config.backend_origin)
            .expect("backend origin is a valid header value");

        Self {
            config,
            http,
            allow_origin,
        }
    }
}

/// Wildcard proxy route accepting the standard CRUD verbs plus preflight.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(
            "/api/proxy/*path",
            get(forward)
                .post(forward)
                .put(forward)
                .patch(forward)
                .delete(forward)
                .options(preflight),
        )
        .with_state(state)
}

async fn forward(
    State(state): State<ProxyState>,
    Path(path): Path<String>,
    req: Request,
) -> Response {
    let (parts, body) = req.into_parts();
    let method = parts.method;

    let target = match build_target(&state.config.backend_origin, &path, parts.uri.query()) {
        Ok(target) => target,
        Err(message) => return bad_gateway(message),
    };

    // GET and HEAD carry no body; everything else forwards the raw bytes
    // unmodified.
    let body_bytes: Option<Bytes> = if matches!(method, Method::GET | Method::HEAD) {
        None
    } else {
        match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => Some(bytes),
            Err(err) => return bad_gateway(format!("failed to read request body: {err}")),
        }
    };

    let headers = match forward_headers(&parts.headers, &target) {
        Ok(headers) => headers,
        Err(message) => return bad_gateway(message),
    };

    let mut outbound = state.http.request(method, target.clone()).headers(headers);
    if let Some(bytes) = body_bytes {
        outbound = outbound.body(bytes);
    }

    match outbound.send().await {
        Ok(upstream) => relay(upstream),
        Err(err) => {
            tracing::warn!("proxy upstream call to {} failed: {}", target, err);
            bad_gateway(err.to_string())
        }
    }
}

/// Preflight requests are answered at the edge and never reach the backend.
async fn preflight(State(state): State<ProxyState>) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert("access-control-allow-origin", state.allow_origin.clone());
    headers.insert(
        "access-control-allow-credentials",
        HeaderValue::from_static("true"),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,PUT,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

/// Concatenate origin, captured path segments, and the original query string
/// so GET requests stay cache- and trace-compatible with direct calls.
fn build_target(backend_origin: &str, path: &str, query: Option<&str>) -> Result<Url, String> {
    let mut target = format!("{backend_origin}/{path}");
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    Url::parse(&target).map_err(|err| format!("invalid proxy target {target}: {err}"))
}

/// Copy inbound headers minus the hop-by-hop set, then pin `host` to the
/// backend's host; the inbound value names the proxy itself.
fn forward_headers(inbound: &HeaderMap, target: &Url) -> Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();
    for (name, value) in inbound {
        if HOP_BY_HOP_HEADERS.contains(&name.as_str()) {
            continue;
        }
        headers.append(name, value.clone());
    }

    let host = match target.port() {
        Some(port) => format!("{}:{}", target.host_str().unwrap_or_default(), port),
        None => target.host_str().unwrap_or_default().to_string(),
    };
    let host = HeaderValue::from_str(&host)
        .map_err(|err| format!("invalid backend host {host}: {err}"))?;
    headers.insert(header::HOST, host);

    Ok(headers)
}

/// Copy the backend's status and full header set (Set-Cookie included) onto
/// the response and stream the body through unchanged.
fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let headers = upstream.headers().clone();

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Connection-level failures become a 502 error envelope so downstream
/// consumers keep seeing the envelope contract instead of a raw exception.
fn bad_gateway(message: impl Into<String>) -> Response {
    let envelope = Envelope::<()>::Error(ErrorEnvelope::from_message(message));
    (StatusCode::BAD_GATEWAY, Json(envelope)).into_response()
}
