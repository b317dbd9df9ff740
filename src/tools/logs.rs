//! Tools for browsing and clearing the log feed
//!
//! This module implements the habit_logs and habit_logs_clear MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{flatten_log_feed, FeedEntry};
use crate::domain::Ledger;
use crate::tools::{find_habit, ToolError};

/// Default number of feed rows returned
const DEFAULT_LOG_LIMIT: usize = 20;

/// Parameters for browsing the log feed
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct LogsParams {
    /// Only show entries for this habit (optional)
    #[serde(default)]
    pub habit_id: Option<String>,
    /// Maximum number of entries, newest first (default 20)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parameters for clearing every log
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ClearLogsParams {
    /// Must be true; clearing drops the log history of every habit
    #[serde(default)]
    pub confirm: bool,
}

/// Response from browsing the log feed
#[derive(Debug, Serialize)]
pub struct LogsResponse {
    /// Entries matching the filter before the limit was applied
    pub total: usize,
    pub entries: Vec<FeedEntry>,
    pub message: String,
}

/// Response from clearing logs
#[derive(Debug, Serialize)]
pub struct ClearLogsResponse {
    pub changed: bool,
    pub message: String,
}

/// Recent log entries across all habits, newest first
pub fn get_logs(ledger: &Ledger, params: LogsParams) -> Result<LogsResponse, ToolError> {
    let filter = match params.habit_id.as_deref() {
        Some(raw) => Some(find_habit(ledger, raw)?.id.clone()),
        None => None,
    };

    let matching: Vec<FeedEntry> = flatten_log_feed(ledger.habits())
        .into_iter()
        .filter(|e| filter.as_ref().map_or(true, |id| &e.habit_id == id))
        .collect();
    let total = matching.len();
    let entries: Vec<FeedEntry> = matching
        .into_iter()
        .take(params.limit.unwrap_or(DEFAULT_LOG_LIMIT))
        .collect();

    let message = if entries.is_empty() {
        "No logs yet.".to_string()
    } else {
        let lines = entries
            .iter()
            .map(|e| format!("- {} ({}): {}", e.habit_name, e.kind.display_name(), e.describe()))
            .collect::<Vec<_>>()
            .join("\n");
        format!("🧾 **Recent logs** ({} of {})\n{}", entries.len(), total, lines)
    };

    Ok(LogsResponse { total, entries, message })
}

/// Drop all logs from all habits
pub fn clear_logs(ledger: &mut Ledger, params: ClearLogsParams) -> Result<ClearLogsResponse, ToolError> {
    if !params.confirm {
        return Err(ToolError::Validation(
            "Clearing logs cannot be undone; pass confirm: true to proceed".to_string(),
        ));
    }

    let changed = ledger.clear_logs();
    let message = if changed {
        format!("🧹 Cleared all logs from {} habit(s)", ledger.habits().len())
    } else {
        "There were no logs to clear.".to_string()
    };
    Ok(ClearLogsResponse { changed, message })
}
