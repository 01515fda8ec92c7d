use std::fmt;

use super::DocumentStore;
use crate::error::StoreError;

/// Exit status used when `--strict` is set and a collection failed.
pub const PARTIAL_FAILURE_EXIT: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Nothing was listed, so no write was issued.
    Empty,
    /// One batch holding this many deletes was committed.
    Deleted(usize),
}

impl fmt::Display for ClearOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClearOutcome::Empty => write!(f, "(empty)"),
            ClearOutcome::Deleted(count) => write!(f, "deleted {} doc(s)", count),
        }
    }
}

#[derive(Debug)]
pub struct CollectionReport {
    pub collection: String,
    pub result: Result<ClearOutcome, StoreError>,
}

impl CollectionReport {
    pub fn line(&self) -> String {
        match &self.result {
            Ok(outcome) => format!("{}: {}", self.collection, outcome),
            Err(e) => format!("{}: error - {}", self.collection, e),
        }
    }
}

/// Outcome of every collection in a run, in processing order.
#[derive(Debug, Default)]
pub struct ClearReport {
    pub collections: Vec<CollectionReport>,
}

impl ClearReport {
    pub fn has_failures(&self) -> bool {
        self.collections.iter().any(|c| c.result.is_err())
    }

    pub fn deleted_total(&self) -> usize {
        self.collections
            .iter()
            .map(|c| match c.result {
                Ok(ClearOutcome::Deleted(count)) => count,
                _ => 0,
            })
            .sum()
    }

    pub fn failed_collections(&self) -> Vec<&str> {
        self.collections
            .iter()
            .filter(|c| c.result.is_err())
            .map(|c| c.collection.as_str())
            .collect()
    }

    /// Failed collections only change the exit status when `strict` is set.
    pub fn exit_status(&self, strict: bool) -> u8 {
        if strict && self.has_failures() {
            PARTIAL_FAILURE_EXIT
        } else {
            0
        }
    }
}

/// Deletes every document present in `collection` when it is listed.
///
/// Documents written after the listing are left alone. The deletes go out as a
/// single commit, so a collection larger than the store's batch limit fails as
/// a whole.
pub async fn erase_collection<S>(store: &S, collection: &str) -> Result<ClearOutcome, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let documents = store.list_documents(collection).await?;
    if documents.is_empty() {
        return Ok(ClearOutcome::Empty);
    }

    let count = documents.len();
    store.commit_deletes(documents).await?;
    Ok(ClearOutcome::Deleted(count))
}

/// Erases `collections` one after another. A failing collection is reported
/// and the run moves on to the next one.
pub async fn clear_collections<S>(store: &S, collections: &[String]) -> ClearReport
where
    S: DocumentStore + ?Sized,
{
    println!("Clearing root-level Firestore collections...\n");

    let mut report = ClearReport::default();
    for collection in collections {
        let result = erase_collection(store, collection).await;
        let entry = CollectionReport {
            collection: collection.clone(),
            result,
        };

        match &entry.result {
            Ok(_) => println!("  {}", entry.line()),
            Err(e) => {
                log::debug!("{collection}: {e:?}");
                eprintln!("  {}", entry.line());
            }
        }
        report.collections.push(entry);
    }

    log::info!(
        "Deleted {} document(s), {} collection(s) failed",
        report.deleted_total(),
        report.failed_collections().len()
    );
    println!("\nDone. Firestore root data cleared.");

    report
}
