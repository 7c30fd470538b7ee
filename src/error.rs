// Client-side error types raised by the envelope client.
use std::collections::HashMap;

use reqwest::StatusCode;
use thiserror::Error;

use crate::envelope::ErrorEnvelope;

/// Typed failure surfaced by [`crate::client::ApiClient`]. Constructed at the
/// point a non-success envelope or non-2xx status is observed and consumed
/// immediately by the calling layer; never retried, never persisted.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend reported `status: "error"`, responded non-2xx, or returned
    /// a 2xx body matching neither envelope variant. The original error
    /// envelope is preserved for field-level validation display.
    #[error("{message}")]
    Api {
        message: String,
        status: StatusCode,
        envelope: Option<ErrorEnvelope>,
    },

    /// No HTTP response at all (DNS, connection, timeout). Distinguishable
    /// from envelope-level errors so callers can message it differently.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A success envelope arrived but its `data` payload did not match the
    /// shape the caller asked for.
    #[error("failed to decode response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn api(
        message: impl Into<String>,
        status: StatusCode,
        envelope: Option<ErrorEnvelope>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            status,
            envelope,
        }
    }

    /// HTTP status associated with the failure, when one was observed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Decode(_) => None,
        }
    }

    /// Structured field->messages mapping for inline form errors, when the
    /// backend supplied one.
    pub fn field_errors(&self) -> Option<&HashMap<String, Vec<String>>> {
        match self {
            Self::Api {
                envelope: Some(envelope),
                ..
            } => envelope.errors.as_ref(),
            _ => None,
        }
    }
}
