//! Scripted stand-ins for a browser tab and a download target.
//!
//! [`VirtualList`] behaves like a virtualized track list: rows have a fixed
//! height and only the ones overlapping the viewport (plus a small overscan)
//! are rendered.

#![allow(dead_code)]

use deezer_export::error::{BrowserError, Result};
use deezer_export::export::{Delivery, Downloader, ListPage, PageLocation, ScrollMetrics};
use scraper::{Html, Selector};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const PLAYLIST_URL: &str = "https://www.deezer.com/en/playlist/908622995";
pub const ROW_HEIGHT: f64 = 50.0;
pub const VIEWPORT: f64 = 900.0;
const OVERSCAN: f64 = 200.0;

/// `outerHTML` of a track list row holding `cells`
pub fn row_html(index: &str, cells: &str) -> String {
    format!(r#"<div role="row" aria-rowindex="{}">{}</div>"#, index, cells)
}

/// Cells of a fully rendered Deezer track row
pub fn track_cells(index: u32) -> String {
    let mut cells = format!(
        r#"<img data-testid="cover" src="/images/cover/{i}.jpg">
        <span data-testid="title">Track {i}</span>
        <a data-testid="artist" href="/en/artist/{a}">Artist {a}</a>
        <a data-testid="album" href="/en/album/{b}">Album {b}</a>
        <span data-testid="duration">3:{s:02}</span>
        <span class="xogtX">2024-01-15</span>
        <div data-testid="popularity" aria-label="Popularity: 4/5"></div>"#,
        i = index,
        a = index % 7,
        b = index % 4,
        s = index % 60,
    );

    if index % 3 == 0 {
        cells.push_str(r#"<svg data-testid="HeartFilledIcon"></svg>"#);
    }
    if index % 2 == 0 {
        cells.push_str(r#"<svg data-testid="MicrophoneIcon"></svg>"#);
    }
    cells
}

/// A fully rendered Deezer track row
pub fn track_row(index: u32) -> String {
    row_html(&index.to_string(), &track_cells(index))
}

/// A row whose cells have not rendered yet
pub fn placeholder_row(index: u32) -> String {
    row_html(&index.to_string(), r#"<span data-testid="title"></span>"#)
}

fn row_index_of(html: &str) -> Option<u32> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("[aria-rowindex]").ok()?;
    fragment.select(&selector).next()?.value().attr("aria-rowindex")?.parse().ok()
}

/// Scripted virtualized list page
pub struct VirtualList {
    pub href: String,
    document: String,
    rows: Vec<String>,
    extra_rows: Vec<String>,
    offset: Cell<f64>,
    frozen: bool,
    late_rows: HashSet<u32>,
    seen_late: RefCell<HashSet<u32>>,
    cancel_on_settle: RefCell<Option<(usize, CancellationToken)>>,
    fail_rows: bool,
    pub settles: RefCell<Vec<Duration>>,
    pub scrolls: RefCell<Vec<f64>>,
    pub row_queries: Cell<usize>,
}

impl VirtualList {
    /// A playlist page with `count` tracks numbered from 1
    pub fn with_tracks(count: u32) -> Self {
        Self::with_rows((1..=count).map(track_row).collect())
    }

    pub fn with_rows(rows: Vec<String>) -> Self {
        Self {
            href: PLAYLIST_URL.to_string(),
            document: String::new(),
            rows,
            extra_rows: Vec::new(),
            offset: Cell::new(0.0),
            frozen: false,
            late_rows: HashSet::new(),
            seen_late: RefCell::new(HashSet::new()),
            cancel_on_settle: RefCell::new(None),
            fail_rows: false,
            settles: RefCell::new(Vec::new()),
            scrolls: RefCell::new(Vec::new()),
            row_queries: Cell::new(0),
        }
    }

    pub fn at(mut self, href: &str) -> Self {
        self.href = href.to_string();
        self
    }

    /// Title shown in the masthead
    pub fn masthead(mut self, title: &str) -> Self {
        self.document.push_str(&format!(r#"<div data-testid="masthead"><h2>{}</h2></div>"#, title));
        self
    }

    pub fn h1(mut self, title: &str) -> Self {
        self.document.push_str(&format!("<h1>{}</h1>", title));
        self
    }

    /// Rows rendered on every pass regardless of the scroll position
    pub fn always_rendered(mut self, rows: Vec<String>) -> Self {
        self.extra_rows = rows;
        self
    }

    /// Scrolling has no effect
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// These rows come up as placeholders the first time they render
    pub fn late(mut self, indices: &[u32]) -> Self {
        self.late_rows = indices.iter().copied().collect();
        self
    }

    /// Cancel `token` during the `nth` settle (1-based)
    pub fn cancel_on_settle(self, nth: usize, token: CancellationToken) -> Self {
        *self.cancel_on_settle.borrow_mut() = Some((nth, token));
        self
    }

    /// Row queries fail as if the script threw
    pub fn failing_rows(mut self) -> Self {
        self.fail_rows = true;
        self
    }

    pub fn scroll_height(&self) -> f64 {
        self.rows.len() as f64 * ROW_HEIGHT
    }

    fn max_offset(&self) -> f64 {
        (self.scroll_height() - VIEWPORT).max(0.0)
    }

    fn render(&self, position: usize, row: &str) -> String {
        let index = row_index_of(row).unwrap_or(position as u32);

        if self.late_rows.contains(&index) && self.seen_late.borrow_mut().insert(index) {
            return placeholder_row(index);
        }
        row.to_string()
    }
}

impl ListPage for VirtualList {
    fn location(&self) -> Result<PageLocation> {
        PageLocation::from_href(&self.href)
    }

    fn text_of(&self, selector: &str) -> Result<Option<String>> {
        let selector = Selector::parse(selector).map_err(|e| BrowserError::ScriptFailed(format!("{:?}", e)))?;
        let document = Html::parse_document(&self.document);
        Ok(document.select(&selector).next().map(|el| el.text().collect::<String>().trim().to_string()))
    }

    fn scroll_metrics(&self) -> Result<ScrollMetrics> {
        Ok(ScrollMetrics { offset: self.offset.get(), scroll_height: self.scroll_height(), viewport_height: VIEWPORT })
    }

    fn scroll_to(&self, offset: f64) -> Result<()> {
        self.scrolls.borrow_mut().push(offset);
        if !self.frozen {
            self.offset.set(offset.clamp(0.0, self.max_offset()));
        }
        Ok(())
    }

    fn rendered_rows(&self, _row_selector: &str) -> Result<Vec<String>> {
        self.row_queries.set(self.row_queries.get() + 1);

        if self.fail_rows {
            return Err(BrowserError::ScriptFailed("rows are not reachable".to_string()));
        }

        let top = self.offset.get() - OVERSCAN;
        let bottom = self.offset.get() + VIEWPORT + OVERSCAN;

        let mut rendered: Vec<String> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(position, _)| {
                let row_top = *position as f64 * ROW_HEIGHT;
                row_top + ROW_HEIGHT > top && row_top < bottom
            })
            .map(|(position, row)| self.render(position, row))
            .collect();

        rendered.extend(self.extra_rows.iter().cloned());
        Ok(rendered)
    }

    fn settle(&self, delay: Duration) {
        self.settles.borrow_mut().push(delay);

        let settles = self.settles.borrow().len();
        if let Some((nth, token)) = self.cancel_on_settle.borrow().as_ref() {
            if settles == *nth {
                token.cancel();
            }
        }
    }
}

/// Keeps every payload in memory
#[derive(Default)]
pub struct RecordingDownloader {
    pub unsupported: bool,
    pub deliveries: RefCell<Vec<(String, String)>>,
}

impl RecordingDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A target that refuses files
    pub fn unsupported() -> Self {
        Self { unsupported: true, ..Self::default() }
    }

    pub fn payload(&self) -> Option<String> {
        self.deliveries.borrow().last().map(|(_, payload)| payload.clone())
    }
}

impl Downloader for RecordingDownloader {
    fn deliver(&self, filename: &str, payload: &str) -> Result<Delivery> {
        self.deliveries.borrow_mut().push((filename.to_string(), payload.to_string()));

        if self.unsupported {
            return Ok(Delivery::Unsupported("downloads are disabled".to_string()));
        }
        Ok(Delivery::Saved(format!("/downloads/{}", filename).into()))
    }
}
