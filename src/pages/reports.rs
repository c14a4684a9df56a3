//! Reports Page
//!
//! Downloads the server-rendered exports.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use super::PageError;
use crate::api::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn path(self) -> &'static str {
        match self {
            ExportFormat::Csv => "/reports/export/csv/",
            ExportFormat::Excel => "/reports/export/excel/",
            ExportFormat::Pdf => "/reports/export/pdf/",
        }
    }

    /// Fixed name the download is saved under
    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Csv => "transactions.csv",
            ExportFormat::Excel => "transactions.xlsx",
            ExportFormat::Pdf => "financial_report.pdf",
        }
    }
}

/// Fetch an export as raw bytes
pub async fn export_report(api: &ApiClient, format: ExportFormat) -> Result<Vec<u8>, PageError> {
    Ok(api.get_bytes(format.path()).await?)
}

/// Fetch an export and write it into `target_dir`, replacing any previous
/// download of the same format
pub async fn download_report(
    api: &ApiClient,
    format: ExportFormat,
    target_dir: &Path,
) -> Result<PathBuf, PageError> {
    let bytes = export_report(api, format).await?;

    tokio::fs::create_dir_all(target_dir)
        .await
        .map_err(|e| PageError::Io(e.to_string()))?;

    let file_path = target_dir.join(format.filename());
    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| PageError::Io(e.to_string()))?;

    info!("Saved {} ({} bytes)", file_path.display(), bytes.len());
    Ok(file_path)
}
