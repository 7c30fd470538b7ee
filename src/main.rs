use std::sync::Arc;

use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use larago_portal::config::AppConfig;
use larago_portal::proxy::{self, ProxyState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up API_BASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = Arc::new(AppConfig::from_env());
    tracing::info!(
        "Starting {} against backend {}",
        config.app_name,
        config.backend_origin
    );

    let app = app(config);

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORTAL_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("portal gateway listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(config: Arc<AppConfig>) -> Router {
    let banner_config = config.clone();

    Router::new()
        .route("/", get(move || root(banner_config.clone())))
        .route("/health", get(health))
        .merge(proxy::router(ProxyState::new(config)))
        .layer(TraceLayer::new_for_http())
}

async fn root(config: Arc<AppConfig>) -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "status": "success",
        "data": {
            "name": config.app_name,
            "version": version,
            "backend_origin": config.backend_origin,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "proxy": "/api/proxy/* (forwards to the backend origin)",
            }
        }
    }))
}

async fn health() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "status": "success",
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
