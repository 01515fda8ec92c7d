use chrono::Utc;
use jsonwebtoken::{Algorithm, Header, encode};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::settings::credentials::ServiceAccountKey;

pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Claims of the self-signed assertion traded for an access token.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_key(key: &ServiceAccountKey, issued_at: i64) -> Self {
        Claims {
            iss: key.client_email.clone(),
            scope: DATASTORE_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        }
    }
}

pub fn sign_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, StoreError> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = key.encoding_key()?;
    let assertion = encode(&header, &Claims::for_key(key, issued_at), &encoding_key)?;
    Ok(assertion)
}

// Trades a signed assertion for a bearer token at the key's token endpoint
pub async fn get_access_token(
    client: &Client,
    key: &ServiceAccountKey,
) -> Result<String, StoreError> {
    let assertion = sign_assertion(key, Utc::now().timestamp())?;

    log::debug!("Requesting access token for {}", key.client_email);
    let response = client
        .post(&key.token_uri)
        .form(&[
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    let json: Value = response.json().await?;

    if !status.is_success() {
        let reason = json["error_description"]
            .as_str()
            .or_else(|| json["error"].as_str())
            .unwrap_or("no details");
        return Err(StoreError::Token(format!("{status}: {reason}")));
    }

    extract_access_token(&json)
}

fn extract_access_token(json: &Value) -> Result<String, StoreError> {
    json["access_token"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::Token("response did not contain an access token".to_string()))
}
