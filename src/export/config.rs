use crate::error::{BrowserError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Tuning of the scroll-and-scrape loop
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    /// Distance scrolled after each pass
    pub scroll_step_px: f64,

    /// Wait after each scroll step
    pub settle_delay: Duration,

    /// Consecutive stalled passes that end the scan
    pub max_stalled_passes: u32,

    /// How close to the bottom counts as "at the bottom"
    pub bottom_tolerance_px: f64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            scroll_step_px: 500.0,
            settle_delay: Duration::from_millis(1000),
            max_stalled_passes: 5,
            bottom_tolerance_px: 10.0,
        }
    }
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_step(mut self, px: f64) -> Self {
        self.scroll_step_px = px;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn max_stalled_passes(mut self, passes: u32) -> Self {
        self.max_stalled_passes = passes;
        self
    }

    pub fn bottom_tolerance(mut self, px: f64) -> Self {
        self.bottom_tolerance_px = px;
        self
    }

    /// Reject settings under which the scan could never end
    pub fn validate(&self) -> Result<()> {
        if !self.scroll_step_px.is_finite() || self.scroll_step_px <= 0.0 {
            return Err(BrowserError::InvalidArgument(format!(
                "scroll step must be a positive number of pixels, got {}",
                self.scroll_step_px
            )));
        }

        if self.max_stalled_passes == 0 {
            return Err(BrowserError::InvalidArgument("max stalled passes must be at least 1".to_string()));
        }

        if !self.bottom_tolerance_px.is_finite() || self.bottom_tolerance_px < 0.0 {
            return Err(BrowserError::InvalidArgument(format!(
                "bottom tolerance must be a non-negative number of pixels, got {}",
                self.bottom_tolerance_px
            )));
        }

        Ok(())
    }

    /// Wait after jumping to the top, before the first pass
    pub fn initial_settle(&self) -> Duration {
        self.settle_delay / 2
    }

    /// Longer wait once the bottom is reached
    pub fn bottom_settle(&self) -> Duration {
        self.settle_delay * 3 / 2
    }
}

/// Everything one export run needs besides the page itself
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub collector: CollectorConfig,

    /// Element to scroll instead of the window
    pub scroll_container: Option<String>,

    /// Directory the CSV file is written to
    pub output_dir: PathBuf,

    /// Run-history file updated after each successful export
    pub history_file: Option<PathBuf>,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self { output_dir: PathBuf::from("."), ..Self::default() }
    }

    pub fn collector(mut self, collector: CollectorConfig) -> Self {
        self.collector = collector;
        self
    }

    pub fn scroll_container(mut self, selector: impl Into<String>) -> Self {
        self.scroll_container = Some(selector.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }
}
