//! deezer-export command line
//!
//! Opens a Deezer playlist or album (or uses the tab already open in an attached
//! browser), scrolls the track list to the end and writes the tracks to CSV.

use clap::Parser;
use deezer_export::export::{CollectionOutcome, ExportEvent, ExportOptions, ExportTask, ListPage};
use deezer_export::export::{CollectorConfig, DirectoryDownloader};
use deezer_export::tools::utils::normalize_url;
use deezer_export::history;
use deezer_export::{BrowserSession, ConnectionOptions, ExportHistory, LaunchOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "deezer-export")]
#[command(version)]
#[command(about = "Export a Deezer playlist or album to CSV", long_about = None)]
struct Cli {
    /// Playlist or album URL, or a bare path such as playlist/908622995.
    /// Without it the active tab is exported as is.
    url: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL of a running browser to attach to
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Directory the CSV is written to
    #[arg(long, short = 'o', value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Run-history file updated after each export
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Print the run history and exit
    #[arg(long, requires = "history")]
    show_history: bool,

    /// Pixels scrolled between passes
    #[arg(long, default_value_t = 500.0)]
    scroll_step: f64,

    /// Milliseconds to wait after each scroll
    #[arg(long, default_value_t = 1000)]
    settle_ms: u64,

    /// Passes without new songs before giving up
    #[arg(long, default_value_t = 5)]
    max_stalls: u32,

    /// CSS selector of the scrolling element, when the list does not scroll the window
    #[arg(long, value_name = "SELECTOR")]
    scroll_container: Option<String>,

    /// Milliseconds to let the page render after navigation
    #[arg(long, default_value_t = 3000)]
    initial_wait_ms: u64,
}

impl Cli {
    fn export_options(&self) -> ExportOptions {
        let collector = CollectorConfig::default()
            .scroll_step(self.scroll_step)
            .settle_delay(Duration::from_millis(self.settle_ms))
            .max_stalled_passes(self.max_stalls);

        let mut options = ExportOptions::new().collector(collector).output_dir(&self.out_dir);
        options.scroll_container = self.scroll_container.clone();
        options.history_file = self.history.clone();
        options
    }

    fn open_session(&self) -> deezer_export::Result<BrowserSession> {
        if let Some(endpoint) = &self.ws_endpoint {
            return BrowserSession::connect(ConnectionOptions::new(endpoint.clone()));
        }

        let mut options = LaunchOptions::new().headless(!self.headed);
        if let Some(path) = &self.executable_path {
            options = options.chrome_path(path.clone());
        }
        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir.clone());
        }
        BrowserSession::launch(options)
    }
}

fn print_history(path: &Path) -> deezer_export::Result<()> {
    let history = ExportHistory::load(path)?;

    if history.entries().is_empty() {
        println!("No exports recorded in {}", path.display());
        return Ok(());
    }

    for entry in history.entries() {
        println!(
            "{}  {:>5} songs  {}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.song_count,
            entry.name,
            entry.url
        );
    }
    Ok(())
}

fn run_export(cli: &Cli, mut task: ExportTask) -> deezer_export::Result<CollectionOutcome> {
    let options = cli.export_options();
    let session = cli.open_session()?;

    if let Some(url) = &cli.url {
        let url = normalize_url(url);
        log::info!("Opening {}", url);
        session.navigate(&url)?;
        session.wait_for_navigation()?;
    }

    let page = session.page(options.scroll_container.clone())?;
    page.settle(Duration::from_millis(cli.initial_wait_ms));

    let downloader = DirectoryDownloader::new(&options.output_dir);
    let mut progress = |event: &ExportEvent| log::debug!("{:?}", event);

    let outcome = task.run(&page, &downloader, &mut progress)?;

    if let (CollectionOutcome::Exported(summary), Some(path)) = (&outcome, &options.history_file) {
        history::record_export(path, summary);
    }

    Ok(outcome)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.show_history {
        if let Some(path) = &cli.history {
            print_history(path)?;
        }
        return Ok(());
    }

    let collector = cli.export_options().collector;
    collector.validate()?;

    let task = ExportTask::new(collector);
    let cancel = task.cancel_token();

    let mut handle = tokio::task::spawn_blocking(move || run_export(&cli, task));

    let joined = tokio::select! {
        joined = &mut handle => joined,
        _ = tokio::signal::ctrl_c() => {
            log::warn!("Interrupted, stopping after the current pass...");
            cancel.cancel();
            handle.await
        }
    };

    match joined?? {
        CollectionOutcome::Exported(summary) => match &summary.path {
            Some(path) => println!("Exported {} songs from \"{}\" to {}", summary.count, summary.name, path.display()),
            None => println!("Extracted {} songs from \"{}\"; CSV printed to the log", summary.count, summary.name),
        },
        CollectionOutcome::Empty => {
            eprintln!("No songs found on the page.");
            std::process::exit(1);
        }
        CollectionOutcome::Cancelled { collected } => {
            eprintln!("Cancelled after {} songs; no file written.", collected);
            std::process::exit(130);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["deezer-export", "playlist/1"]);
        let options = cli.export_options();

        assert_eq!(cli.url.as_deref(), Some("playlist/1"));
        assert_eq!(options.collector, CollectorConfig::default());
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert!(options.history_file.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "deezer-export",
            "--scroll-step",
            "300",
            "--settle-ms",
            "250",
            "--max-stalls",
            "2",
            "--scroll-container",
            "main",
            "--history",
            "runs.json",
        ]);
        let options = cli.export_options();

        assert_eq!(cli.url, None);
        assert_eq!(options.collector.scroll_step_px, 300.0);
        assert_eq!(options.collector.settle_delay, Duration::from_millis(250));
        assert_eq!(options.collector.max_stalled_passes, 2);
        assert_eq!(options.scroll_container.as_deref(), Some("main"));
        assert_eq!(options.history_file, Some(PathBuf::from("runs.json")));
    }

    #[test]
    fn test_zero_scroll_step_is_rejected_before_launch() {
        let cli = Cli::parse_from(["deezer-export", "--scroll-step=0"]);
        assert!(cli.export_options().collector.validate().is_err());

        let cli = Cli::parse_from(["deezer-export", "--max-stalls=0"]);
        assert!(cli.export_options().collector.validate().is_err());
    }

    #[test]
    fn test_show_history_requires_file() {
        assert!(Cli::try_parse_from(["deezer-export", "--show-history"]).is_err());
    }
}
