//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

/// Ensure the data directory exists before the document store opens its backing file.
pub async fn ensure_data_dir(data_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}
