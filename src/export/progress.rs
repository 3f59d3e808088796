use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of a run that produced a CSV payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Playlist or album title
    pub name: String,

    /// Suggested file name of the CSV
    pub filename: String,

    /// Number of exported tracks
    pub count: usize,

    /// Address of the exported page
    pub url: String,

    /// Where the file was written, when the download target accepted it
    pub path: Option<PathBuf>,
}

/// Milestones of an export run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportEvent {
    Started,
    ContextResolved { name: String },
    ScrollStarted,
    PassCompleted { total: usize, new: usize, offset: f64, scroll_height: f64 },
    RowSkipped { row_index: String, reason: String },
    CsvGenerated { bytes: usize },
    DownloadInitiated { filename: String },
    Completed(ExportSummary),
    Failed { message: String },
}

/// Receiver of export milestones
pub trait ProgressSink {
    fn emit(&mut self, event: &ExportEvent);
}

impl<F: FnMut(&ExportEvent)> ProgressSink for F {
    fn emit(&mut self, event: &ExportEvent) {
        self(event)
    }
}

/// Discards every event
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _event: &ExportEvent) {}
}

/// Keeps every event in order
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<ExportEvent>,
}

impl ProgressSink for EventLog {
    fn emit(&mut self, event: &ExportEvent) {
        self.events.push(event.clone());
    }
}

impl EventLog {
    /// Per-pass running totals, in order
    pub fn running_totals(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExportEvent::PassCompleted { total, .. } => Some(*total),
                _ => None,
            })
            .collect()
    }
}
