//! Local filesystem CSV output.

use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Sheet;
use crate::storage::OutputSink;

/// Render a sheet as CSV: header row first, then one line per row.
pub fn render_csv(sheet: &Sheet) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !sheet.header().is_empty() {
        writer.write_record(sheet.header())?;
    }
    for row in sheet.rows() {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

/// Create `dir` if needed and check that files can be written in it.
pub async fn ensure_writable(dir: &Path) -> Result<()> {
    let unusable = |e: std::io::Error| {
        AppError::config(format!("output directory {} is not writable: {e}", dir.display()))
    };
    tokio::fs::create_dir_all(dir).await.map_err(unusable)?;

    let marker = dir.join(".pfr-scrape-write-check");
    tokio::fs::write(&marker, b"").await.map_err(unusable)?;
    tokio::fs::remove_file(&marker).await.map_err(unusable)?;
    Ok(())
}

/// Writes CSV files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCsvSink;

impl LocalCsvSink {
    pub fn new() -> Self {
        Self
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl OutputSink for LocalCsvSink {
    async fn write(&self, path: &Path, sheet: &Sheet) -> Result<()> {
        let bytes = render_csv(sheet)?;
        self.write_bytes(path, &bytes).await?;
        log::debug!("Wrote {} rows to {}", sheet.len(), path.display());
        Ok(())
    }
}
