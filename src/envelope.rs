// ADR-003 style response envelope shared by the backend API, the client,
// and the proxy's own error responses.
use std::collections::HashMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Uniform JSON wrapper every backend response conforms to. Discriminated on
/// the `status` field so the "matches neither shape" case is unreachable
/// through normal matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success { data: T },
    Error(ErrorEnvelope),
}

/// Error variant payload: a human-readable message plus optional per-field
/// validation messages for inline form display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl ErrorEnvelope {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: None,
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Interpret an already-parsed JSON body. Returns `None` when the body
    /// carries no recognizable `status` discriminator (the malformed case);
    /// the caller decides how to surface that.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}
