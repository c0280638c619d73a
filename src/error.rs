// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! Application-level failures (wrong password, duplicate email) are not
//! errors here: they come back as an [`ApiResponse`](crate::models::ApiResponse)
//! with `success = false`. `ClientError` covers everything that kept us from
//! getting a usable answer out of the service.

use reqwest::StatusCode;

/// Error type returned by the API gateway client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Invalid request: {0}")]
    Validation(String),
}

impl ClientError {
    /// Message surfaced to users for any transport-level failure.
    pub const NETWORK_ERROR: &'static str = "Network error";

    /// True when the failure happened below the application layer:
    /// unreachable host, timeout, unreadable body or an unexpected status.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Decode(_) | ClientError::Http { .. }
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Result type alias for gateway calls.
pub type Result<T> = std::result::Result<T, ClientError>;
