//! In-memory [`DocumentStore`] used by the eraser and driver tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{DocumentRef, DocumentStore};
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Commit(Vec<DocumentRef>),
}

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, Vec<DocumentRef>>>,
    failing_list: HashSet<String>,
    failing_commit: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

fn document_name(collection: &str, id: &str) -> String {
    format!("projects/test/databases/(default)/documents/{collection}/{id}")
}

fn collection_of(doc: &DocumentRef) -> Option<&str> {
    let (path, _id) = doc.name.rsplit_once('/')?;
    path.rsplit('/').next()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(self, collection: &str, count: usize) -> Self {
        let docs = (0..count)
            .map(|i| DocumentRef {
                name: document_name(collection, &format!("doc{i}")),
            })
            .collect();
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), docs);
        self
    }

    pub fn failing_list(mut self, collection: &str) -> Self {
        self.failing_list.insert(collection.to_string());
        self
    }

    pub fn failing_commit(mut self, collection: &str) -> Self {
        self.failing_commit.insert(collection.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<Vec<DocumentRef>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Commit(docs) => Some(docs),
                Call::List(_) => None,
            })
            .collect()
    }

    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<DocumentRef>, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::List(collection.to_string()));

        if self.failing_list.contains(collection) {
            return Err(StoreError::Api {
                status: 503,
                message: "UNAVAILABLE: connection reset".to_string(),
            });
        }

        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn commit_deletes(&self, documents: Vec<DocumentRef>) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Commit(documents.clone()));

        let touches_failing = documents.iter().any(|doc| {
            collection_of(doc).is_some_and(|c| self.failing_commit.contains(c))
        });
        if touches_failing {
            return Err(StoreError::Api {
                status: 400,
                message: "INVALID_ARGUMENT: maximum 500 writes allowed per request".to_string(),
            });
        }

        let doomed: HashSet<&str> = documents.iter().map(|d| d.name.as_str()).collect();
        for docs in self.collections.lock().unwrap().values_mut() {
            docs.retain(|d| !doomed.contains(d.name.as_str()));
        }
        Ok(())
    }
}
