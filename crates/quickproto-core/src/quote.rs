//! Quote documents: PDF bytes persisted behind a locally addressable, owned handle.
//!
//! A `QuoteDocument` owns its file. Dropping or revoking it removes the file, so whoever
//! holds the handle decides its lifetime.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// One received quote, backed by a `.pdf` file that lives exactly as long as this value.
#[derive(Debug)]
pub struct QuoteDocument {
    path: TempPath,
    size: usize,
    received_at: DateTime<Utc>,
}

impl QuoteDocument {
    /// Write `bytes` to a fresh `quote-*.pdf` file under `dir`.
    pub fn persist(dir: &Path, bytes: &[u8]) -> std::io::Result<Self> {
        use std::io::Write;

        std::fs::create_dir_all(dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("quote-")
            .suffix(".pdf")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self {
            path: file.into_temp_path(),
            size: bytes.len(),
            received_at: Utc::now(),
        })
    }

    /// `persist` on tokio's blocking pool, for callers running on async workers.
    pub async fn store(dir: PathBuf, bytes: Vec<u8>) -> std::io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::persist(&dir, &bytes))
            .await
            .map_err(std::io::Error::other)?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Release the handle now and remove its file.
    pub fn revoke(self) {
        let shown = self.path.display().to_string();
        match self.path.close() {
            Ok(()) => tracing::debug!(path = %shown, "quote document revoked"),
            Err(e) => tracing::warn!(path = %shown, error = %e, "quote document revoke failed"),
        }
    }
}
