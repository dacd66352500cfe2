//! Error types for the REST client.
//!
//! Transport failures and non-2xx statuses surface here. Application-level
//! validation failures (`errors` maps embedded in 2xx bodies) are not
//! errors at this layer; they decode into the rejected arm of the
//! operation outcome so callers can keep pending edits staged.

use thiserror::Error;

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL is unusable.
    #[error("Invalid API base URL '{url}'")]
    InvalidBaseUrl { url: String },

    /// Failed to construct the HTTP client.
    #[error("Failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// Network-level failure before a response arrived.
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded its timeout.
    #[error("Request to {path} timed out")]
    Timeout { path: String },

    /// The server answered with a non-success status.
    #[error("Server returned {status} for {path}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response decoded but did not have the expected shape.
    #[error("Malformed response from {path}: {detail}")]
    Malformed { path: String, detail: String },
}

impl ApiError {
    /// Classify a reqwest error for a given request path.
    pub fn from_reqwest(path: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ApiError::Timeout {
                path: path.to_string(),
            }
        } else {
            ApiError::Transport {
                path: path.to_string(),
                source,
            }
        }
    }

    /// Short message for the status banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidBaseUrl { url } => format!("Bad API base URL: {url}"),
            ApiError::ClientBuild { .. } => "Could not initialize HTTP client".to_string(),
            ApiError::Transport { path, .. } => format!("Network error on {path}"),
            ApiError::Timeout { path } => format!("Timed out waiting for {path}"),
            ApiError::Status { path, status, .. } => format!("Server error {status} on {path}"),
            ApiError::Decode { path, .. } | ApiError::Malformed { path, .. } => {
                format!("Unreadable response from {path}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_user_message_names_path_and_code() {
        let err = ApiError::Status {
            path: "/api/Vendor/filter".to_string(),
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.user_message(), "Server error 500 on /api/Vendor/filter");
    }
}
