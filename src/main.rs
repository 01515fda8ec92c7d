mod arguments;
mod database;
mod error;
mod settings;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use crate::arguments::modeling::Args;
use crate::database::DocumentStore;
use crate::database::clear::clear_collections;
use crate::database::firestore::FirestoreClient;
use crate::error::{CredentialError, StoreError};
use crate::settings::credentials::{KEY_REMEDIATION, ServiceAccountKey, default_key_path};
use crate::settings::targets::default_collections;

const KEY_ERROR_EXIT: u8 = 1;

// What to print when the key cannot be used. A missing key also gets the
// steps to download one.
fn key_error_message(error: &CredentialError) -> String {
    match error {
        CredentialError::NotFound { .. } => format!("{}\n{}", error, KEY_REMEDIATION),
        _ => error.to_string(),
    }
}

// Loads the key, connects through `connect` and wipes `collections`.
// Returns the process exit status.
async fn run<S, F>(
    key_path: &Path,
    collections: &[String],
    strict: bool,
    connect: F,
) -> Result<u8, StoreError>
where
    S: DocumentStore,
    F: FnOnce(ServiceAccountKey) -> Result<S, StoreError>,
{
    let key = match ServiceAccountKey::load(key_path) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{}", key_error_message(&e));
            return Ok(KEY_ERROR_EXIT);
        }
    };
    log::info!(
        "Using service account {} on project {}",
        key.client_email,
        key.project_id
    );

    let store = connect(key)?;
    let report = clear_collections(&store, collections).await;

    Ok(report.exit_status(strict))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_filter())).init();

    let emulator_host = std::env::var("FIRESTORE_EMULATOR_HOST")
        .ok()
        .filter(|host| !host.is_empty());

    let status = run(
        &default_key_path(),
        &default_collections(),
        args.strict,
        |key| FirestoreClient::new(key, emulator_host),
    )
    .await?;

    Ok(ExitCode::from(status))
}
