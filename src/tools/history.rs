use crate::error::Result;
use crate::history::ExportHistory;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the export_history tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExportHistoryParams {
    /// Only return the most recent entries
    #[serde(default)]
    pub limit: Option<usize>,
}

/// List recent exports, newest first
#[derive(Default)]
pub struct ExportHistoryTool;

impl Tool for ExportHistoryTool {
    type Params = ExportHistoryParams;

    fn name(&self) -> &str {
        "export_history"
    }

    fn execute_typed(&self, params: ExportHistoryParams, context: &mut ToolContext) -> Result<ToolResult> {
        let Some(path) = &context.options.history_file else {
            return Ok(ToolResult::failure("No history file configured"));
        };

        let history = ExportHistory::load(path)?;
        let limit = params.limit.unwrap_or(usize::MAX);
        let entries: Vec<_> = history.entries().iter().take(limit).collect();

        Ok(ToolResult::success_with(serde_json::json!({
            "path": history.path().display().to_string(),
            "count": entries.len(),
            "entries": entries,
        })))
    }
}
