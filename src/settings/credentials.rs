use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::error::CredentialError;

pub const KEY_FILE_NAME: &str = "serviceAccountKey.json";

pub const KEY_REMEDIATION: &str = "Get it from: Firebase Console → Project Settings → Service accounts → Generate new private key";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

// Subset of the JSON key downloaded from the Firebase console
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,

    #[serde(default)]
    pub private_key_id: Option<String>,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// The key lives next to the executable. When the executable path cannot be
/// resolved the current directory is used instead.
pub fn default_key_path() -> PathBuf {
    let base = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(KEY_FILE_NAME)
}

impl ServiceAccountKey {
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        log::debug!("Reading service account key: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => CredentialError::NotFound {
                path: path.to_path_buf(),
            },
            _ => CredentialError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let key: ServiceAccountKey =
            serde_json::from_str(&content).map_err(|source| CredentialError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        // A broken PEM is rejected here, before any request goes out
        if let Err(source) = key.encoding_key() {
            return Err(CredentialError::InvalidPrivateKey {
                path: path.to_path_buf(),
                source,
            });
        }

        Ok(key)
    }

    pub fn encoding_key(&self) -> Result<EncodingKey, jsonwebtoken::errors::Error> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes())
    }
}
