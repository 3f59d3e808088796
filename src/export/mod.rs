//! Track list export
//!
//! One run goes through three stages:
//! - [`context`]: resolve the playlist or album name used for output naming
//! - [`collector`]: scroll the virtualized list, extract rows, deduplicate by
//!   row index and decide when the list is exhausted
//! - [`csv`]: serialize the ordered records and hand them to a [`Downloader`]
//!
//! [`ExportTask`] wires them together over any [`ListPage`].

pub mod collector;
pub mod config;
pub mod context;
pub mod csv;
pub mod download;
pub mod extractor;
pub mod page;
pub mod progress;
pub mod record;
pub mod task;

pub use collector::{Collection, ScanState, ScrollCollector, StallTracker, StopReason};
pub use config::{CollectorConfig, ExportOptions};
pub use context::{ContextResolver, DEFAULT_CONTEXT_NAME};
pub use download::{Delivery, DirectoryDownloader, Downloader};
pub use extractor::{RowExtractor, RowSelectors};
pub use page::{ListPage, PageLocation, ScrollMetrics};
pub use progress::{EventLog, ExportEvent, ExportSummary, NullSink, ProgressSink};
pub use record::{HEADERS, RecordSet, TrackRecord};
pub use task::{CollectionOutcome, ExportTask, RunState};
