use crate::error::{BrowserError, Result};
use crate::export::{CollectionOutcome, DirectoryDownloader, EventLog, ExportEvent, ExportOptions, ExportTask};
use crate::history::record_export;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for the export_playlist tool; unset fields keep the session defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExportPlaylistParams {
    /// Pixels scrolled between passes (default: 500)
    #[serde(default)]
    pub scroll_step_px: Option<f64>,

    /// Milliseconds to wait after each scroll (default: 1000)
    #[serde(default)]
    pub settle_ms: Option<u64>,

    /// Passes without new rows before giving up (default: 5)
    #[serde(default)]
    pub max_stalled_passes: Option<u32>,

    /// CSS selector of the scrolling element, when the list does not scroll the window
    #[serde(default)]
    pub scroll_container: Option<String>,

    /// Directory the CSV is written to
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl ExportPlaylistParams {
    fn apply(&self, mut options: ExportOptions) -> ExportOptions {
        if let Some(step) = self.scroll_step_px {
            options.collector.scroll_step_px = step;
        }
        if let Some(ms) = self.settle_ms {
            options.collector.settle_delay = Duration::from_millis(ms);
        }
        if let Some(passes) = self.max_stalled_passes {
            options.collector.max_stalled_passes = passes;
        }
        if let Some(selector) = &self.scroll_container {
            options.scroll_container = Some(selector.clone());
        }
        if let Some(dir) = &self.output_dir {
            options.output_dir = dir.into();
        }
        options
    }
}

/// Export the track list of the active tab to CSV
#[derive(Default)]
pub struct ExportPlaylistTool;

impl Tool for ExportPlaylistTool {
    type Params = ExportPlaylistParams;

    fn name(&self) -> &str {
        "export_playlist"
    }

    fn execute_typed(&self, params: ExportPlaylistParams, context: &mut ToolContext) -> Result<ToolResult> {
        let options = params.apply(context.options.clone());

        let page = context.session.page(options.scroll_container.clone())?;
        let downloader = DirectoryDownloader::new(&options.output_dir);
        let mut task = ExportTask::new(options.collector.clone());
        let mut events = EventLog::default();

        let outcome = match task.run(&page, &downloader, &mut events) {
            Ok(outcome) => outcome,
            Err(BrowserError::NotTargetPage { url }) => {
                return Ok(ToolResult::failure_with(
                    "Not a Deezer page",
                    serde_json::json!({ "status": "error", "url": url }),
                ));
            }
            Err(e @ BrowserError::InvalidArgument(_)) => return Err(e),
            Err(e) => {
                return Err(BrowserError::ToolExecutionFailed { tool: self.name().to_string(), reason: e.to_string() });
            }
        };

        let skipped_rows: Vec<&str> = events
            .events
            .iter()
            .filter_map(|e| match e {
                ExportEvent::RowSkipped { row_index, .. } => Some(row_index.as_str()),
                _ => None,
            })
            .collect();

        let data = match &outcome {
            CollectionOutcome::Exported(summary) => {
                if let Some(path) = &options.history_file {
                    record_export(path, summary);
                }
                serde_json::json!({
                    "status": "completed",
                    "summary": summary,
                    "passes": events.running_totals(),
                    "skipped_rows": skipped_rows,
                })
            }
            CollectionOutcome::Empty => serde_json::json!({
                "status": "empty",
                "passes": events.running_totals(),
                "skipped_rows": skipped_rows,
            }),
            CollectionOutcome::Cancelled { collected } => serde_json::json!({
                "status": "cancelled",
                "collected": collected,
            }),
        };

        Ok(ToolResult::success_with(data))
    }
}
