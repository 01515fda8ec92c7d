pub mod auth;
pub mod clear;
pub mod firestore;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::StoreError;

/// Full resource name of a single document, as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentRef {
    pub name: String,
}

/// The two operations the eraser needs from a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document currently in `collection`, at the time of the call.
    async fn list_documents(&self, collection: &str) -> Result<Vec<DocumentRef>, StoreError>;

    /// Deletes all `documents` in one atomic write.
    async fn commit_deletes(&self, documents: Vec<DocumentRef>) -> Result<(), StoreError>;
}
