// Session endpoints: login/refresh/logout plus the authenticated principal.
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Rotated token pair returned alongside the HttpOnly cookies the backend
/// sets; callers use it to hydrate client-side auth state.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authenticated identity and its permission slugs as reported by the
/// backend. Gates protected navigation and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl Principal {
    /// Permission check over the principal's slugs (e.g. `admin.users.view`).
    pub fn has_permission(&self, slug: &str) -> bool {
        self.permissions.iter().any(|p| p == slug)
    }
}

/// Friendly acknowledgement for calls whose payload the UI does not need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

pub async fn login(client: &ApiClient, payload: &LoginPayload) -> Result<AuthTokens, ClientError> {
    client.post("/v1/next-auth/login", payload).await
}

/// Rotate the refresh token; the backend falls back to the cookie when no
/// override is provided.
pub async fn refresh_session(
    client: &ApiClient,
    refresh_token: Option<&str>,
) -> Result<AuthTokens, ClientError> {
    client
        .post("/v1/next-auth/refresh", &json!({ "refresh_token": refresh_token }))
        .await
}

/// Ask the backend to clear cookies and revoke both tokens. The tokens are
/// not echoed back to the caller.
pub async fn logout(
    client: &ApiClient,
    refresh_token: Option<&str>,
    access_token: Option<&str>,
) -> Result<Ack, ClientError> {
    let _: Value = client
        .post(
            "/v1/next-auth/logout",
            &json!({ "refresh_token": refresh_token, "access_token": access_token }),
        )
        .await?;
    Ok(Ack {
        message: "Logged out".to_string(),
    })
}

pub async fn fetch_principal(client: &ApiClient) -> Result<Principal, ClientError> {
    client.get("/v1/user").await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            id: "u-1".to_string(),
            email: "admin@example.com".to_string(),
            roles: vec!["admin".to_string()],
            permissions: vec![
                "admin.users.view".to_string(),
                "admin.roles.view".to_string(),
            ],
        }
    }

    #[test]
    fn test_has_permission_matches_exact_slug() {
        let principal = principal();
        assert!(principal.has_permission("admin.users.view"));
        assert!(!principal.has_permission("admin.users"));
        assert!(!principal.has_permission("admin.teams.view"));
    }
}
