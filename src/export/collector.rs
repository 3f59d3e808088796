//! Scroll-driven collection of a virtualized track list.
//!
//! The list only renders rows near the viewport and never says how long it
//! is, so the end is inferred from two independent signals:
//! - several passes in a row find no new rows while the scroll offset stays
//!   put ([`is_exhausted`]),
//! - the viewport reaches the bottom of the scrollable area ([`is_at_bottom`]).
//!
//! State progression: `Scanning -> Stalling(k) -> Done(Exhausted)` or
//! `Scanning -> AtBottom -> Done(ReachedBottom)`.

use crate::error::{BrowserError, Result};
use crate::export::config::CollectorConfig;
use crate::export::extractor::RowExtractor;
use crate::export::page::{ListPage, ScrollMetrics};
use crate::export::progress::{ExportEvent, ProgressSink};
use crate::export::record::RecordSet;
use tokio_util::sync::CancellationToken;

/// Why the scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Too many passes without new rows or scroll movement
    Exhausted,
    /// Bottom of the scrollable area reached
    ReachedBottom,
    /// Cancelled through the task's token
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    /// `k` consecutive passes without new rows
    Stalling(u32),
    AtBottom,
    Done(StopReason),
}

/// Whether the stall streak ends the scan
pub fn is_exhausted(streak: u32, threshold: u32) -> bool {
    streak >= threshold
}

/// Whether the viewport touches the bottom, within `tolerance` pixels
pub fn is_at_bottom(metrics: &ScrollMetrics, tolerance: f64) -> bool {
    metrics.offset + metrics.viewport_height >= metrics.scroll_height - tolerance
}

/// Whether the offset moved less than half a scroll step
pub fn is_negligible_move(previous: f64, current: f64, step: f64) -> bool {
    (current - previous).abs() < step / 2.0
}

/// Tracks passes that found nothing new
#[derive(Debug, Clone)]
pub struct StallTracker {
    streak: u32,
    previous_offset: Option<f64>,
    step: f64,
}

impl StallTracker {
    pub fn new(step: f64) -> Self {
        Self { streak: 0, previous_offset: None, step }
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn previous_offset(&self) -> Option<f64> {
        self.previous_offset
    }

    /// Account for one pass that found `newly_found` rows at `offset`
    pub fn observe(&mut self, newly_found: usize, offset: f64) -> ScanState {
        if newly_found > 0 {
            self.streak = 0;
            return ScanState::Scanning;
        }

        match self.previous_offset {
            Some(previous) if is_negligible_move(previous, offset, self.step) => {
                self.streak += 1;
                log::info!("No new songs & no scroll change, counter: {}", self.streak);
            }
            Some(_) => {
                self.streak = 1;
                log::info!("Scrolled but no new songs yet.");
            }
            // first pass: nothing to compare against yet
            None => {}
        }

        if self.streak == 0 { ScanState::Scanning } else { ScanState::Stalling(self.streak) }
    }

    /// Remember the offset the next scroll starts from
    pub fn advance(&mut self, offset: f64) {
        self.previous_offset = Some(offset);
    }
}

/// Outcome of a scan: the frozen record set and why it stopped
#[derive(Debug)]
pub struct Collection {
    pub records: RecordSet,
    pub stop: StopReason,
    /// Extraction passes performed, the bottom pass included
    pub passes: u32,
}

/// Owns the record set for the duration of one scan
pub struct ScrollCollector<'a, P: ListPage + ?Sized> {
    page: &'a P,
    extractor: &'a RowExtractor,
    config: &'a CollectorConfig,
    cancel: CancellationToken,
    state: ScanState,
}

impl<'a, P: ListPage + ?Sized> ScrollCollector<'a, P> {
    pub fn new(page: &'a P, extractor: &'a RowExtractor, config: &'a CollectorConfig, cancel: CancellationToken) -> Self {
        Self { page, extractor, config, cancel, state: ScanState::Scanning }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Scroll from the top until a terminal condition fires.
    ///
    /// Page errors (scripts failing to run) abort the scan; a row that cannot
    /// be extracted is reported and skipped.
    pub fn collect(&mut self, sink: &mut dyn ProgressSink) -> Result<Collection> {
        self.config.validate()?;

        let mut records = RecordSet::new();
        let mut tracker = StallTracker::new(self.config.scroll_step_px);
        let mut passes = 0;

        log::info!("Scrolling down to collect all songs...");
        sink.emit(&ExportEvent::ScrollStarted);

        self.page.scroll_to(0.0)?;
        self.page.settle(self.config.initial_settle());

        let stop = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let metrics = self.page.scroll_metrics()?;
            let before = records.len();
            self.extraction_pass(&mut records, sink)?;
            passes += 1;
            let newly_found = records.len() - before;

            log::info!(
                "Scraped. Total unique: {} (+{} new). Scroll: {}/{}",
                records.len(),
                newly_found,
                metrics.offset.round(),
                metrics.scroll_height
            );
            sink.emit(&ExportEvent::PassCompleted {
                total: records.len(),
                new: newly_found,
                offset: metrics.offset,
                scroll_height: metrics.scroll_height,
            });

            self.state = tracker.observe(newly_found, metrics.offset);

            if is_exhausted(tracker.streak(), self.config.max_stalled_passes) {
                log::info!("Reached max attempts without finding new songs or scroll change. Assuming end.");
                break StopReason::Exhausted;
            }

            if is_at_bottom(&metrics, self.config.bottom_tolerance_px) {
                self.state = ScanState::AtBottom;
                log::info!("Reached bottom of scrollable area.");
                self.page.settle(self.config.bottom_settle());

                if self.cancel.is_cancelled() {
                    break StopReason::Cancelled;
                }

                let before = records.len();
                self.extraction_pass(&mut records, sink)?;
                passes += 1;

                let found = records.len() - before;
                if found > 0 {
                    log::info!("Found {} more song(s) at the bottom.", found);
                }
                break StopReason::ReachedBottom;
            }

            tracker.advance(metrics.offset);
            self.page.scroll_to(metrics.offset + self.config.scroll_step_px)?;
            self.page.settle(self.config.settle_delay);
        };

        self.state = ScanState::Done(stop);
        if stop != StopReason::Cancelled {
            log::info!("Final song count: {}", records.len());
        }

        Ok(Collection { records, stop, passes })
    }

    /// Extract every rendered row into `records`; returns how many were admitted
    fn extraction_pass(&self, records: &mut RecordSet, sink: &mut dyn ProgressSink) -> Result<usize> {
        let rows = self.page.rendered_rows(&self.extractor.selectors().row_css)?;
        let mut admitted = 0;

        for row in &rows {
            match self.extractor.extract(row) {
                Ok(Some(record)) => {
                    if records.upsert(record) {
                        admitted += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    let row_index = match &e {
                        BrowserError::RowExtraction { row_index, .. } => row_index.clone(),
                        _ => String::new(),
                    };
                    log::warn!("{}", e);
                    sink.emit(&ExportEvent::RowSkipped { row_index, reason: e.to_string() });
                }
            }
        }

        Ok(admitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_exhausted() {
        assert!(!is_exhausted(4, 5));
        assert!(is_exhausted(5, 5));
        assert!(is_exhausted(6, 5));
    }

    #[test]
    fn test_is_at_bottom() {
        let at = ScrollMetrics { offset: 1091.0, scroll_height: 2000.0, viewport_height: 900.0 };
        let near = ScrollMetrics { offset: 1089.0, scroll_height: 2000.0, viewport_height: 900.0 };
        assert!(is_at_bottom(&at, 10.0));
        assert!(!is_at_bottom(&near, 10.0));

        let short = ScrollMetrics { offset: 0.0, scroll_height: 600.0, viewport_height: 900.0 };
        assert!(is_at_bottom(&short, 10.0));
    }

    #[test]
    fn test_is_negligible_move() {
        assert!(is_negligible_move(1000.0, 1249.0, 500.0));
        assert!(is_negligible_move(1000.0, 751.0, 500.0));
        assert!(!is_negligible_move(1000.0, 1250.0, 500.0));
        assert!(!is_negligible_move(0.0, 500.0, 500.0));
    }

    #[test]
    fn test_tracker_first_pass_without_rows_does_not_stall() {
        let mut tracker = StallTracker::new(500.0);
        assert_eq!(tracker.observe(0, 0.0), ScanState::Scanning);
        assert_eq!(tracker.streak(), 0);
        assert_eq!(tracker.previous_offset(), None);
    }

    #[test]
    fn test_tracker_counts_stalls_without_movement() {
        let mut tracker = StallTracker::new(500.0);
        tracker.observe(10, 0.0);
        tracker.advance(0.0);

        for expected in 1..=3 {
            assert_eq!(tracker.observe(0, 100.0), ScanState::Stalling(expected));
            tracker.advance(100.0);
        }
    }

    #[test]
    fn test_tracker_movement_resets_to_one() {
        let mut tracker = StallTracker::new(500.0);
        tracker.advance(0.0);
        tracker.observe(0, 0.0);
        tracker.observe(0, 0.0);
        assert_eq!(tracker.streak(), 2);

        assert_eq!(tracker.observe(0, 500.0), ScanState::Stalling(1));
    }

    #[test]
    fn test_tracker_new_rows_reset() {
        let mut tracker = StallTracker::new(500.0);
        tracker.advance(0.0);
        tracker.observe(0, 0.0);
        assert_eq!(tracker.observe(2, 0.0), ScanState::Scanning);
        assert_eq!(tracker.streak(), 0);
    }
}
