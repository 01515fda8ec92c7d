use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the service account key. All of them are fatal.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Missing {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service account key {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid private key in {}: {source}", .path.display())]
    InvalidPrivateKey {
        path: PathBuf,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// Failures talking to the document store. Scoped to a single collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("token exchange failed: {0}")]
    Token(String),

    #[error("could not sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_missing_file() {
        let err = CredentialError::NotFound {
            path: PathBuf::from("scripts/serviceAccountKey.json"),
        };
        assert_eq!(err.to_string(), "Missing scripts/serviceAccountKey.json");
    }

    #[test]
    fn api_error_shows_message_and_status() {
        let err = StoreError::Api {
            status: 403,
            message: "Missing or insufficient permissions.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing or insufficient permissions. (HTTP 403)"
        );
    }
}
