use thiserror::Error;

/// Errors produced while driving the browser or exporting a track list
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Failed to parse page script output: {0}")]
    DomParseFailed(String),

    /// The active page is not a Deezer page; raised before any extraction
    #[error("Not a Deezer page: {url}")]
    NotTargetPage { url: String },

    /// An extraction script could not be loaded or run in the page
    #[error("Export script failed: {0}")]
    ScriptFailed(String),

    /// A single rendered row could not be turned into a record
    #[error("Error processing song row index {row_index}: {reason}")]
    RowExtraction { row_index: String, reason: String },

    #[error("Export task has already been started")]
    AlreadyStarted,

    #[error("Download failed: {0}")]
    Download(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BrowserError>;
