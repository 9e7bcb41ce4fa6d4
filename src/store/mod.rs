//! Document store connector.
//!
//! The database handle is built once at startup and injected into the
//! handlers, there is no global connection state. Connecting performs a
//! `ping` as a fail-fast dependency check: the process is expected to
//! terminate if the store is unreachable.

use anyhow::{Context, Result};
use mongodb::{bson::doc, Client, Database};
use tracing::info;

pub mod users;

const DEFAULT_DATABASE: &str = "portero";

/// Connect to the document store and verify the connection.
/// # Errors
/// Return error if the DSN is invalid or the store does not answer the ping
pub async fn connect(dsn: &str) -> Result<Database> {
    let client = Client::with_uri_str(dsn)
        .await
        .context("Failed to parse document store DSN")?;

    let database = client
        .default_database()
        .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

    // The driver connects lazily, a ping forces the roundtrip now
    database
        .run_command(doc! { "ping": 1 })
        .await
        .context("Failed to connect to document store")?;

    info!(database = %database.name(), "Connected to document store");

    Ok(database)
}
