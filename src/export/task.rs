use crate::error::{BrowserError, Result};
use crate::export::collector::{ScrollCollector, StopReason};
use crate::export::config::CollectorConfig;
use crate::export::context::ContextResolver;
use crate::export::csv::{export_filename, to_csv};
use crate::export::download::{Delivery, Downloader};
use crate::export::extractor::{RowExtractor, RowSelectors};
use crate::export::page::ListPage;
use crate::export::progress::{ExportEvent, ExportSummary, ProgressSink};
use tokio_util::sync::CancellationToken;

/// Lifecycle of an [`ExportTask`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Cancelled,
    Completed,
    Failed,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionOutcome {
    /// A CSV payload was produced and handed to the downloader
    Exported(ExportSummary),
    /// The page never rendered a usable row; nothing was produced
    Empty,
    /// Cancelled before the scan finished; nothing was produced
    Cancelled { collected: usize },
}

/// One export run over one page: resolve the context name, scroll-collect
/// the rows, serialize them and hand the CSV to a downloader.
///
/// A task runs at most once; clone [`ExportTask::cancel_token`] to stop it
/// from another thread.
pub struct ExportTask {
    config: CollectorConfig,
    cancel: CancellationToken,
    state: RunState,
}

impl ExportTask {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config, cancel: CancellationToken::new(), state: RunState::Idle }
    }

    /// Token that stops the scan at its next pass or settle
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Run the export.
    ///
    /// Invalid collector settings and non-Deezer pages are rejected before
    /// anything is touched; the task stays `Idle`. Failures of
    /// the page itself are returned as errors and reported as `Failed`; rows
    /// that cannot be read are skipped.
    pub fn run<P, D>(&mut self, page: &P, downloader: &D, sink: &mut dyn ProgressSink) -> Result<CollectionOutcome>
    where
        P: ListPage + ?Sized,
        D: Downloader + ?Sized,
    {
        if self.state != RunState::Idle {
            return Err(BrowserError::AlreadyStarted);
        }

        self.config.validate()?;

        let location = page.location()?;
        if !location.is_target_site() {
            return Err(BrowserError::NotTargetPage { url: location.href });
        }

        self.state = RunState::Running;
        match self.execute(page, downloader, sink, &location.href, &location.origin) {
            Ok(outcome) => {
                self.state = match outcome {
                    CollectionOutcome::Cancelled { .. } => RunState::Cancelled,
                    _ => RunState::Completed,
                };
                Ok(outcome)
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                sink.emit(&ExportEvent::Failed { message: e.to_string() });
                self.state = RunState::Failed;
                Err(e)
            }
        }
    }

    fn execute<P, D>(
        &self,
        page: &P,
        downloader: &D,
        sink: &mut dyn ProgressSink,
        href: &str,
        origin: &str,
    ) -> Result<CollectionOutcome>
    where
        P: ListPage + ?Sized,
        D: Downloader + ?Sized,
    {
        let selectors = RowSelectors::deezer()?;
        log::info!("Starting Deezer song extraction (Selector: \"{}\")...", selectors.row_css);
        sink.emit(&ExportEvent::Started);

        let name = ContextResolver::deezer().resolve(page);
        sink.emit(&ExportEvent::ContextResolved { name: name.clone() });

        let filename = export_filename(&name);
        log::info!("Will use filename: \"{}\"", filename);

        let extractor = RowExtractor::new(selectors, origin, name.clone())?;
        let collection = ScrollCollector::new(page, &extractor, &self.config, self.cancel.clone()).collect(sink)?;

        if collection.stop == StopReason::Cancelled {
            log::warn!("Export cancelled after collecting {} songs. No file written.", collection.records.len());
            return Ok(CollectionOutcome::Cancelled { collected: collection.records.len() });
        }

        log::info!("Scrolling finished. Extracted {} unique songs.", collection.records.len());

        if collection.records.is_empty() {
            log::warn!("No song data extracted. Check selectors and page content.");
            return Ok(CollectionOutcome::Empty);
        }

        let records = collection.records.into_sorted();
        let payload = to_csv(&records);
        log::info!("CSV string generated.");
        sink.emit(&ExportEvent::CsvGenerated { bytes: payload.len() });

        let path = match downloader.deliver(&filename, &payload)? {
            Delivery::Saved(path) => {
                log::info!("CSV download initiated as \"{}\".", filename);
                sink.emit(&ExportEvent::DownloadInitiated { filename: filename.clone() });
                Some(path)
            }
            Delivery::Unsupported(reason) => {
                log::error!("Download target does not accept files ({}).", reason);
                log::info!("CSV Data:\n{}", payload);
                None
            }
        };

        let summary = ExportSummary { name, filename, count: records.len(), url: href.to_string(), path };
        sink.emit(&ExportEvent::Completed(summary.clone()));

        Ok(CollectionOutcome::Exported(summary))
    }
}

impl Default for ExportTask {
    fn default() -> Self {
        Self::new(CollectorConfig::default())
    }
}
