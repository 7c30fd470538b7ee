#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

use larago_portal::config::AppConfig;
use larago_portal::proxy::{self, ProxyState};

/// In-process stand-in for the remote backend API. Serves canned envelopes on
/// known paths and echoes everything else, so tests can observe exactly what
/// a forwarded request looked like on arrival.
pub struct StubBackend {
    pub base_url: String,
    /// Number of requests that reached the echo fallback.
    pub hits: Arc<AtomicUsize>,
}

pub async fn spawn_stub() -> Result<StubBackend> {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = stub_router(hits.clone());

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind stub backend")?;
    let base_url = format!("http://127.0.0.1:{port}");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend");
    });

    Ok(StubBackend { base_url, hits })
}

/// Serve an arbitrary router on a free port and return its base URL. Used to
/// exercise the portal end to end over real sockets.
pub async fn serve_router(app: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind router")?;
    let base_url = format!("http://127.0.0.1:{port}");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("router");
    });

    Ok(base_url)
}

/// Proxy router wired to the given backend origin, as the portal binary
/// assembles it.
pub fn proxy_app(backend_origin: &str) -> Router {
    let config = Arc::new(AppConfig::new(backend_origin, "http://localhost:3000"));
    proxy::router(ProxyState::new(config))
}

fn stub_router(hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/plain", get(plain))
        .route("/malformed", get(malformed))
        .route("/redirect", get(redirect))
        .route("/v1/user", get(current_user))
        .route("/v1/notifications", get(notifications))
        .route("/v1/next-auth/login", post(login))
        .route("/admin/users", get(admin_users))
        .fallback(echo)
        .with_state(hits)
}

async fn plain() -> Json<Value> {
    Json(json!({"status": "success", "data": {"x": 1}}))
}

async fn malformed() -> Json<Value> {
    Json(json!({}))
}

async fn redirect() -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, "/login")
        .header(
            header::SET_COOKIE,
            "larago_session=abc123; Path=/; HttpOnly",
        )
        .body(Body::empty())
        .expect("redirect response")
}

async fn current_user() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": {
            "id": "u-1",
            "email": "admin@example.com",
            "roles": ["admin"],
            "permissions": ["admin.users.view", "admin.roles.view"]
        }
    }))
}

async fn notifications() -> Json<Value> {
    // No unread_count on purpose; the client must fall back to counting.
    Json(json!({
        "status": "success",
        "data": {
            "notifications": [
                {"id": "n-1", "title": "Welcome", "read_at": null},
                {"id": "n-2", "title": "Reminder", "read_at": "2026-08-01T10:00:00Z"}
            ],
            "meta": {"page": 1, "per_page": 10, "total": 2}
        }
    }))
}

async fn login(Json(payload): Json<Value>) -> Response {
    let email = payload
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if email.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "status": "error",
                "message": "bad input",
                "errors": {"email": ["required"]}
            })),
        )
            .into_response();
    }

    // Sets the session cookie the way the real backend does, so tests can
    // observe the client replaying credentials on later calls.
    (
        [(header::SET_COOKIE, "larago_session=xyz; Path=/; HttpOnly")],
        Json(json!({
            "status": "success",
            "data": {"access_token": "at-1", "refresh_token": "rt-1"}
        })),
    )
        .into_response()
}

async fn admin_users() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": {
            "users": [
                {"id": "u-1", "email": "admin@example.com", "roles": ["admin"], "teams": []}
            ],
            "meta": {"page": 1, "per_page": 20, "total": 1}
        }
    }))
}

/// Echo the received method, path, query, headers, and body inside a success
/// envelope.
async fn echo(State(hits): State<Arc<AtomicUsize>>, req: Request) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let headers: serde_json::Map<String, Value> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).to_string()),
            )
        })
        .collect();

    Json(json!({
        "status": "success",
        "data": {
            "method": parts.method.as_str(),
            "path": parts.uri.path(),
            "query": parts.uri.query(),
            "headers": headers,
            "body": String::from_utf8_lossy(&bytes),
        }
    }))
}
