//! deezer-export MCP Server
//!
//! Exposes playlist export as Model Context Protocol tools so AI assistants and
//! other MCP clients can open a Deezer page and export its tracks.

use clap::{Parser, ValueEnum};
use deezer_export::browser::{BrowserSession, ConnectionOptions, LaunchOptions};
use deezer_export::export::ExportOptions;
use deezer_export::mcp::BrowserServer;
use rmcp::{
    ServiceExt,
    transport::{
        stdio,
        streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
    },
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    /// Standard input/output transport (default)
    Stdio,
    /// HTTP streamable transport
    Http,
}

#[derive(Parser)]
#[command(name = "deezer-export-mcp")]
#[command(version)]
#[command(about = "Deezer playlist export MCP server", long_about = None)]
struct Cli {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Directory exported CSV files are written to
    #[arg(long, short = 'o', value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Run-history file updated after each export
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Transport type to use
    #[arg(long, short = 't', value_enum, default_value = "stdio")]
    transport: Transport,

    /// Port for HTTP transport (default: 3000)
    #[arg(long, short = 'p', default_value = "3000")]
    port: u16,

    /// HTTP streamable endpoint path (default: /mcp)
    #[arg(long, default_value = "/mcp")]
    http_path: String,
}

impl Cli {
    fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new().headless(!self.headed);
        if let Some(path) = &self.executable_path {
            options = options.chrome_path(path.clone());
        }
        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir.clone());
        }
        options
    }

    fn export_options(&self) -> ExportOptions {
        let mut options = ExportOptions::new().output_dir(&self.out_dir);
        options.history_file = self.history.clone();
        options
    }
}

fn create_server(
    launch: &LaunchOptions,
    ws_endpoint: Option<&str>,
    export: &ExportOptions,
) -> deezer_export::Result<BrowserServer> {
    let server = match ws_endpoint {
        Some(url) => BrowserServer::with_session(BrowserSession::connect(ConnectionOptions::new(url))?),
        None => BrowserServer::with_options(launch.clone())?,
    };
    Ok(server.with_export_options(export.clone()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol; logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let launch = cli.launch_options();
    let export = cli.export_options();

    eprintln!("deezer-export MCP Server v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Browser mode: {}", if launch.headless { "headless" } else { "headed" });
    eprintln!("Output directory: {}", export.output_dir.display());

    if let Some(ref endpoint) = cli.ws_endpoint {
        eprintln!("WebSocket endpoint: {}", endpoint);
    }

    if let Some(ref path) = export.history_file {
        eprintln!("History file: {}", path.display());
    }

    match cli.transport {
        Transport::Stdio => {
            eprintln!("Transport: stdio");
            eprintln!("Ready to accept MCP connections via stdio");
            let service = create_server(&launch, cli.ws_endpoint.as_deref(), &export)
                .map_err(|e| format!("Failed to create browser server: {}", e))?;
            let server = service.serve(stdio()).await?;
            let quit_reason = server.waiting().await?;
            eprintln!("Server quit with reason: {:?}", quit_reason);
            // Give a small delay for destructors to complete
            tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
            eprintln!("Cleanup complete, exiting...");
        }
        Transport::Http => {
            eprintln!("Transport: HTTP streamable");
            eprintln!("Port: {}", cli.port);
            eprintln!("HTTP path: {}", cli.http_path);

            let bind_addr = format!("127.0.0.1:{}", cli.port);
            let ws_endpoint = cli.ws_endpoint.clone();

            // One browser per MCP session
            let service_factory = move || {
                create_server(&launch, ws_endpoint.as_deref(), &export).map_err(std::io::Error::other)
            };

            let http_service = StreamableHttpService::new(
                service_factory,
                LocalSessionManager::default().into(),
                Default::default(),
            );

            let router = axum::Router::new().nest_service(&cli.http_path, http_service);

            eprintln!("Ready to accept MCP connections at http://{}{}", bind_addr, cli.http_path);

            let listener = tokio::net::TcpListener::bind(bind_addr).await?;
            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}
