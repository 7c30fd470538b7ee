// Envelope client: one HTTP call against the backend, unwrapped payload or
// typed error. Domain wrappers live in the submodules.
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::envelope::Envelope;
use crate::error::ClientError;

pub mod admin;
pub mod auth;
pub mod notifications;
pub mod verification;

/// Thin request/response client enforcing the envelope contract. Every call
/// carries credentials (cookie store) and defaults to JSON.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Client for server-side execution contexts: calls hit the backend
    /// origin directly.
    pub fn direct(config: &AppConfig) -> Self {
        Self::with_base(config.backend_origin.clone())
    }

    /// Client for browser-like execution contexts: calls are routed through
    /// the portal's same-origin forwarding proxy to avoid cross-origin
    /// preflight restrictions.
    pub fn through_proxy(config: &AppConfig) -> Self {
        Self::with_base(format!("{}/api/proxy", config.portal_origin))
    }

    fn with_base(base: String) -> Self {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("http client");
        Self { http, base }
    }

    /// Core request path. Normalizes the path to a leading slash, applies the
    /// JSON content-type default (caller headers win), executes the call, and
    /// unwraps the envelope.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: Option<HeaderMap>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base, normalize_path(path));

        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(extra) = headers {
            for (name, value) in extra.iter() {
                header_map.insert(name, value.clone());
            }
        }

        let mut outbound = self.http.request(method, &url).headers(header_map);
        if let Some(body) = body {
            outbound = outbound.json(body);
        }

        let response = outbound.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // Parse failures fall back to an empty object: valid responses such
        // as 204 carry no body, and the envelope check below still applies.
        let value: Value = serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({}));

        unwrap_envelope(status, value)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(&body), None).await
    }

    /// POST without a request body (e.g. resend-verification).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::POST, path, None, None).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(&body), None).await
    }

    /// PATCH without a request body (e.g. mark-notification-read).
    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::PATCH, path, None, None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::DELETE, path, None, None).await
    }
}

/// Apply the envelope contract to one parsed response body.
fn unwrap_envelope<T: DeserializeOwned>(status: StatusCode, value: Value) -> Result<T, ClientError> {
    let status_text = status.canonical_reason().unwrap_or_default().to_string();

    match Envelope::<Value>::from_value(value) {
        // An explicit error envelope wins regardless of HTTP status.
        Some(Envelope::Error(envelope)) => {
            let message = envelope.message.clone().unwrap_or_else(|| status_text.clone());
            Err(ClientError::api(message, status, Some(envelope)))
        }
        // Non-2xx without a recognizable error envelope: surface the HTTP
        // status text with no field errors attached.
        _ if !status.is_success() => Err(ClientError::api(status_text, status, None)),
        Some(Envelope::Success { data }) => Ok(serde_json::from_value(data)?),
        // 2xx matching neither variant is a contract violation upstream.
        None => Err(ClientError::api(status_text, status, None)),
    }
}

/// Guarantee a leading slash so origins can be concatenated safely.
fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
