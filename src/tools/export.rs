//! Tool for exporting habit logs to CSV
//!
//! This module implements the habit_export MCP tool.

use std::path::Path;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::Ledger;
use crate::export::{write_export, ExportFlow};
use crate::tools::ToolError;

/// Parameters for an export
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ExportParams {
    /// "log_feed" (one row per entry) or "daily_summary" (one row per day); default log_feed
    #[serde(default)]
    pub flow: ExportFlow,
}

/// Response from an export
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
    pub rows: usize,
    pub message: String,
}

/// Write the requested CSV into `export_dir`
pub fn export_logs(
    ledger: &Ledger,
    export_dir: &Path,
    today: NaiveDate,
    params: ExportParams,
) -> Result<ExportResponse, ToolError> {
    let path = write_export(export_dir, params.flow, ledger.habits(), today)?;
    let rows = params.flow.render(ledger.habits()).lines().count().saturating_sub(1);

    Ok(ExportResponse {
        path: path.display().to_string(),
        rows,
        message: format!("💾 Exported {} row(s) to {}", rows, path.display()),
    })
}
