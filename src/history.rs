//! Run history: the most recent exports, newest first

use crate::error::{BrowserError, Result};
use crate::export::ExportSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Entries kept on disk
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub name: String,
    pub url: String,
    pub song_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_summary(summary: &ExportSummary, timestamp: DateTime<Utc>) -> Self {
        Self { name: summary.name.clone(), url: summary.url.clone(), song_count: summary.count, timestamp }
    }
}

/// History file backed by JSON
#[derive(Debug, Clone)]
pub struct ExportHistory {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl ExportHistory {
    /// Load the history at `path`; a missing file is an empty history
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| BrowserError::History(format!("Failed to parse {}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Prepend an entry and drop the oldest beyond capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Record a finished export, stamped now
    pub fn record(&mut self, summary: &ExportSummary) {
        self.push(HistoryEntry::from_summary(summary, Utc::now()));
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| BrowserError::History(format!("Failed to serialize history: {}", e)))?;
        std::fs::write(&self.path, json)?;

        Ok(())
    }
}

/// Add a finished export to the history file at `path`.
///
/// Failures are logged, not returned; `false` means the file was not updated.
pub fn record_export(path: &Path, summary: &ExportSummary) -> bool {
    let result = ExportHistory::load(path).and_then(|mut history| {
        history.record(summary);
        history.save()
    });

    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to update export history {}: {}", path.display(), e);
            false
        }
    }
}
