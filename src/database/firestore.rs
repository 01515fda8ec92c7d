use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use super::{DocumentRef, DocumentStore, auth};
use crate::error::StoreError;
use crate::settings::credentials::ServiceAccountKey;

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const EMULATOR_TOKEN: &str = "owner";
const LIST_PAGE_SIZE: u32 = 300;
const USER_AGENT: &str = concat!("firestore-wipe/", env!("CARGO_PKG_VERSION"));

// Firestore REST API payloads
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<DocumentRef>,
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommitRequest {
    writes: Vec<DeleteWrite>,
}

#[derive(Debug, Serialize)]
struct DeleteWrite {
    delete: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    status: Option<String>,
}

enum Auth {
    // Fetched on first use and kept for the rest of the run
    ServiceAccount(OnceCell<String>),
    Emulator,
}

/// Firestore client over the v1 REST API, bound to the key's project and the
/// `(default)` database.
pub struct FirestoreClient {
    http: Client,
    key: ServiceAccountKey,
    base_url: String,
    auth: Auth,
}

impl FirestoreClient {
    pub fn new(key: ServiceAccountKey, emulator_host: Option<String>) -> Result<Self, StoreError> {
        let builder = Client::builder().user_agent(USER_AGENT);

        let (http, base_url, auth) = match emulator_host {
            Some(host) => {
                log::info!("Using Firestore emulator at {host}");
                // The emulator is reached directly, never through a proxy
                (
                    builder.no_proxy().build()?,
                    format!("http://{host}/v1"),
                    Auth::Emulator,
                )
            }
            None => (
                builder.build()?,
                FIRESTORE_BASE_URL.to_string(),
                Auth::ServiceAccount(OnceCell::new()),
            ),
        };

        Ok(FirestoreClient {
            http,
            key,
            base_url,
            auth,
        })
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.key.project_id
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_root(), collection)
    }

    fn commit_url(&self) -> String {
        format!("{}:commit", self.documents_root())
    }

    async fn bearer_token(&self) -> Result<&str, StoreError> {
        match &self.auth {
            Auth::Emulator => Ok(EMULATOR_TOKEN),
            Auth::ServiceAccount(token) => token
                .get_or_try_init(|| auth::get_access_token(&self.http, &self.key))
                .await
                .map(String::as_str),
        }
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    Err(api_error(status.as_u16(), &body))
}

fn api_error(status: u16, body: &str) -> StoreError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: ErrorBody {
                message,
                status: Some(code),
            },
        }) => format!("{code}: {message}"),
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    };
    StoreError::Api { status, message }
}

fn commit_request(documents: Vec<DocumentRef>) -> CommitRequest {
    CommitRequest {
        writes: documents
            .into_iter()
            .map(|doc| DeleteWrite { delete: doc.name })
            .collect(),
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list_documents(&self, collection: &str) -> Result<Vec<DocumentRef>, StoreError> {
        let token = self.bearer_token().await?;
        let url = self.collection_url(collection);

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(token)
                .query(&[("pageSize", LIST_PAGE_SIZE)]);
            if let Some(page_token) = &page_token {
                request = request.query(&[("pageToken", page_token)]);
            }

            let response = check_status(request.send().await?).await?;
            let page: ListDocumentsResponse = serde_json::from_str(&response.text().await?)?;
            log::debug!("{collection}: listed {} document(s)", page.documents.len());

            documents.extend(page.documents);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(documents)
    }

    async fn commit_deletes(&self, documents: Vec<DocumentRef>) -> Result<(), StoreError> {
        let token = self.bearer_token().await?;
        let body = commit_request(documents);
        log::debug!("Committing batch of {} delete(s)", body.writes.len());

        let response = self
            .http
            .post(self.commit_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }
}
