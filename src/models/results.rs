//! Result manifest models.
//!
//! The backend exposes extraction results as a manifest of figures, tables,
//! and pages. Only the fields the dashboard renders are typed; everything
//! else rides along untouched so newer backend fields survive a round trip.

use serde::{Deserialize, Serialize};

/// A figure extracted from the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFigure {
    pub id: String,
    pub page: u32,
    #[serde(default)]
    pub caption: String,
    /// Content hash used to fetch the rendered image.
    pub image_sha: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A table extracted from the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub id: String,
    pub page: u32,
    #[serde(default)]
    pub caption: String,
    /// URL of the CSV export for this table, when the backend produced one.
    pub csv_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-page extraction summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub number: u32,
    #[serde(default)]
    pub figure_count: u32,
    #[serde(default)]
    pub table_count: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Results manifest returned by `GET /api/jobs/{id}/results`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsManifest {
    #[serde(default)]
    pub figures: Vec<ExtractedFigure>,
    #[serde(default)]
    pub tables: Vec<ExtractedTable>,
    #[serde(default)]
    pub pages: Vec<PageResult>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ResultsManifest {
    /// One-line summary for list views and CLI output.
    pub fn summary(&self) -> String {
        format!(
            "{} figures, {} tables across {} pages",
            self.figures.len(),
            self.tables.len(),
            self.pages.len()
        )
    }
}
