// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared by the transport client and the session manager.

use crate::store::StoreError;
use serde_json::Value;

/// Error raised by any call against the MealMate API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received at all.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. Displays as `message` alone.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A 2xx body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Token store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Build an `Http` error from a failed status and its raw body.
    pub fn from_response(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let parsed: Value =
            serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()));

        let message = detail_message(&parsed).unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
        });

        ApiError::Http {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server rejected the credential (invalid or expired token).
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Extract a human-readable message from an error body's `detail` field.
///
/// FastAPI validation failures carry `detail` as a list of `{loc, msg, type}`
/// objects; their `msg` fields are joined.
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(entries) => {
            let msgs: Vec<&str> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                Some(Value::Array(entries.clone()).to_string())
            } else {
                Some(msgs.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

/// Result type alias for client calls
pub type Result<T> = std::result::Result<T, ApiError>;
