//! # deezer-export
//!
//! Export Deezer playlists and albums to CSV by driving a Chrome/Chromium tab over the
//! Chrome DevTools Protocol (CDP).
//!
//! Deezer renders track lists virtually: only the rows near the viewport exist in the DOM.
//! The exporter scrolls the list step by step, reads the HTML of whatever rows are rendered,
//! deduplicates them by their `aria-rowindex` and stops once no new rows appear or the
//! bottom of the list is reached.
//!
//! ## Command line
//!
//! ```bash
//! # Open a playlist in a headless browser and export it to the current directory
//! cargo run --bin deezer-export -- https://www.deezer.com/en/playlist/908622995
//!
//! # Attach to a browser you are already logged into
//! cargo run --bin deezer-export -- --ws-endpoint ws://127.0.0.1:9222/devtools/browser/<id> \
//!     https://www.deezer.com/en/album/302127
//! ```
//!
//! ## MCP Server
//!
//! ```bash
//! cargo run --bin mcp-server --features mcp-server -- --headed
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use deezer_export::{BrowserSession, LaunchOptions};
//! use deezer_export::export::{CollectionOutcome, DirectoryDownloader, ExportTask, NullSink};
//!
//! # fn main() -> deezer_export::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://www.deezer.com/en/playlist/908622995")?;
//! session.wait_for_navigation()?;
//!
//! let page = session.page(None)?;
//! let mut task = ExportTask::default();
//! let outcome = task.run(&page, &DirectoryDownloader::new("."), &mut NullSink)?;
//!
//! if let CollectionOutcome::Exported(summary) = outcome {
//!     println!("{} songs written to {}", summary.count, summary.filename);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the Tool System
//!
//! ```rust,no_run
//! use deezer_export::{BrowserSession, LaunchOptions};
//! use deezer_export::tools::{ToolRegistry, ToolContext};
//! use serde_json::json;
//!
//! # fn main() -> deezer_export::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let registry = ToolRegistry::with_defaults();
//! let mut context = ToolContext::new(&session);
//!
//! registry.execute("navigate", json!({"url": "playlist/908622995"}), &mut context)?;
//! registry.execute("export_playlist", json!({"settle_ms": 1500}), &mut context)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management and the CDP-backed [`ListPage`](export::ListPage)
//! - [`dom`]: Reading rendered row HTML with `scraper` selectors
//! - [`export`]: Context resolution, the scroll collector, CSV output and the run lifecycle
//! - [`history`]: The recent-exports log
//! - [`tools`]: Typed tools (navigate, export_playlist, export_history)
//! - [`error`]: Error types and result aliases
//! - [`mcp`]: Model Context Protocol server (requires `mcp-handler` feature)

pub mod browser;
pub mod dom;
pub mod error;
pub mod export;
pub mod history;
pub mod tools;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, TabPage};
pub use error::{BrowserError, Result};
pub use export::{CollectionOutcome, CollectorConfig, ExportOptions, ExportTask, TrackRecord};
pub use history::{ExportHistory, HistoryEntry, record_export};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};

#[cfg(feature = "mcp-handler")]
pub use mcp::BrowserServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;
