use std::env;

/// Hosted backend used when no environment override is present.
const DEFAULT_BACKEND_ORIGIN: &str = "https://api.softwaremia.com";

/// Origin the portal itself is served from; the browser-side client routes
/// through `{portal_origin}/api/proxy` to stay same-origin.
const DEFAULT_PORTAL_ORIGIN: &str = "http://localhost:3000";

/// Process-wide configuration, resolved once at startup and injected into the
/// client and the proxy state. Immutable after construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote API, trailing slashes stripped.
    pub backend_origin: String,
    /// Base URL of this portal, trailing slashes stripped.
    pub portal_origin: String,
    pub app_name: String,
}

impl AppConfig {
    /// Resolve configuration from the environment. `API_BASE_URL` wins;
    /// `NEXT_PUBLIC_API_BASE_URL` is honored for compatibility with the
    /// original frontend deployment.
    pub fn from_env() -> Self {
        let backend_origin = env::var("API_BASE_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_API_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_BACKEND_ORIGIN.to_string());
        let portal_origin =
            env::var("PORTAL_ORIGIN").unwrap_or_else(|_| DEFAULT_PORTAL_ORIGIN.to_string());

        Self::new(backend_origin, portal_origin)
    }

    /// Build a configuration from explicit origins. Tests inject fake origins
    /// through this constructor instead of touching the environment.
    pub fn new(backend_origin: impl Into<String>, portal_origin: impl Into<String>) -> Self {
        Self {
            backend_origin: normalize_origin(&backend_origin.into()),
            portal_origin: normalize_origin(&portal_origin.into()),
            app_name: "Larago Admin Portal".to_string(),
        }
    }
}

/// Strip trailing slashes so request builders can safely concatenate paths.
fn normalize_origin(origin: &str) -> String {
    origin.trim_end_matches('/').to_string()
}
