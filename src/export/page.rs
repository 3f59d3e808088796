use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Host the exporter accepts, subdomains included
pub const TARGET_HOST: &str = "deezer.com";

/// Scroll position of the list's scroll container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top
    pub offset: f64,

    /// Total scrollable height
    pub scroll_height: f64,

    /// Visible extent of the scroll container
    pub viewport_height: f64,
}

/// Address of the page being exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLocation {
    pub href: String,
    pub origin: String,
}

impl PageLocation {
    /// Build a location from a full URL, deriving the origin
    pub fn from_href(href: &str) -> Result<Self> {
        let url = Url::parse(href).map_err(|e| BrowserError::InvalidArgument(format!("Invalid page URL '{}': {}", href, e)))?;

        Ok(Self { href: href.to_string(), origin: url.origin().ascii_serialization() })
    }

    /// Whether this page belongs to the target site
    pub fn is_target_site(&self) -> bool {
        Url::parse(&self.href)
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| host == TARGET_HOST || host.ends_with(&format!(".{}", TARGET_HOST)))
    }
}

/// The rendering surface the exporter drives.
///
/// A real implementation talks to a browser tab; tests script one.
pub trait ListPage {
    /// Current address of the page
    fn location(&self) -> Result<PageLocation>;

    /// Trimmed text of the first element matching `selector`, if any
    fn text_of(&self, selector: &str) -> Result<Option<String>>;

    /// Current scroll position and extent
    fn scroll_metrics(&self) -> Result<ScrollMetrics>;

    /// Scroll the list to an absolute offset
    fn scroll_to(&self, offset: f64) -> Result<()>;

    /// `outerHTML` of every currently rendered element matching `row_selector`
    fn rendered_rows(&self, row_selector: &str) -> Result<Vec<String>>;

    /// Give the page time to render after a scroll
    fn settle(&self, delay: Duration);
}
