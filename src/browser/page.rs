use crate::dom;
use crate::error::{BrowserError, Result};
use crate::export::page::{ListPage, PageLocation, ScrollMetrics};
use headless_chrome::Tab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

const RENDERED_ROWS_JS: &str = include_str!("scripts/rendered_rows.js");
const SCROLL_JS: &str = include_str!("scripts/scroll.js");
const TEXT_OF_JS: &str = include_str!("scripts/text_of.js");

/// [`ListPage`] backed by a Chrome tab
pub struct TabPage {
    tab: Arc<Tab>,

    /// Element to scroll instead of the window
    scroll_container: Option<String>,

    /// Missing scroll container already reported
    container_warned: Cell<bool>,
}

#[derive(Debug, Deserialize)]
struct ScrollReport {
    offset: f64,
    scroll_height: f64,
    viewport_height: f64,
    container_found: bool,
}

impl TabPage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab, scroll_container: None, container_warned: Cell::new(false) }
    }

    /// Scroll the element matching `selector` instead of the window
    pub fn with_scroll_container(mut self, selector: Option<String>) -> Self {
        self.scroll_container = selector;
        self
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Call one of the embedded script functions and return the JSON string it produces
    fn evaluate_json(&self, script: &str, args: &[serde_json::Value]) -> Result<String> {
        let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
        let js = format!("({})({})", script.trim(), args);

        let result = self.tab.evaluate(&js, false).map_err(|e| BrowserError::ScriptFailed(e.to_string()))?;

        let value = result
            .value
            .ok_or_else(|| BrowserError::ScriptFailed("No value returned from page script".to_string()))?;

        serde_json::from_value(value)
            .map_err(|e| BrowserError::ScriptFailed(format!("Page script did not return a JSON string: {}", e)))
    }

    fn call<T: DeserializeOwned>(&self, script: &str, args: &[serde_json::Value]) -> Result<T> {
        serde_json::from_str(&self.evaluate_json(script, args)?)
            .map_err(|e| BrowserError::DomParseFailed(format!("Failed to parse page script result: {}", e)))
    }

    fn scroll(&self, target: Option<f64>) -> Result<ScrollMetrics> {
        let container = self.scroll_container.as_deref().map(serde_json::Value::from).unwrap_or_default();
        let target = target.map(serde_json::Value::from).unwrap_or_default();

        let report: ScrollReport = self.call(SCROLL_JS, &[container, target])?;

        if let Some(selector) = &self.scroll_container {
            if !report.container_found && !self.container_warned.replace(true) {
                log::error!(
                    "Scroll container element not found: \"{}\". Falling back to window scrolling.",
                    selector
                );
            }
        }

        Ok(ScrollMetrics {
            offset: report.offset,
            scroll_height: report.scroll_height,
            viewport_height: report.viewport_height,
        })
    }
}

impl ListPage for TabPage {
    fn location(&self) -> Result<PageLocation> {
        PageLocation::from_href(&self.tab.get_url())
    }

    fn text_of(&self, selector: &str) -> Result<Option<String>> {
        self.call(TEXT_OF_JS, &[selector.into()])
    }

    fn scroll_metrics(&self) -> Result<ScrollMetrics> {
        self.scroll(None)
    }

    fn scroll_to(&self, offset: f64) -> Result<()> {
        self.scroll(Some(offset)).map(|_| ())
    }

    fn rendered_rows(&self, row_selector: &str) -> Result<Vec<String>> {
        dom::parse_row_html(&self.evaluate_json(RENDERED_ROWS_JS, &[row_selector.into()])?)
    }

    fn settle(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}
