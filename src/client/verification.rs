// Email verification compatibility endpoints.
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Confirm a signed verification link from the email.
pub async fn verify_email_link(
    client: &ApiClient,
    id: &str,
    hash: &str,
) -> Result<VerificationResponse, ClientError> {
    client.get(&format!("/email/verify/{id}/{hash}")).await
}

/// Resend the verification email for the current principal.
pub async fn request_verification_resend(
    client: &ApiClient,
) -> Result<VerificationResponse, ClientError> {
    client.post_empty("/email/verification-notification").await
}
