use crate::browser::{BrowserSession, LaunchOptions};
use crate::error;
use crate::export::ExportOptions;
use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
use std::sync::{Arc, Mutex, MutexGuard};

/// MCP server exposing the export tools over one shared browser session
#[derive(Clone)]
pub struct BrowserServer {
    session: Arc<Mutex<BrowserSession>>,
    options: ExportOptions,
    pub(crate) tool_router: ToolRouter<Self>,
}

impl BrowserServer {
    /// Launch a browser with default options
    pub fn new() -> error::Result<Self> {
        Self::with_options(LaunchOptions::default())
    }

    /// Launch a browser with the given options
    pub fn with_options(options: LaunchOptions) -> error::Result<Self> {
        Ok(Self::with_session(BrowserSession::launch(options)?))
    }

    /// Serve an already launched or connected session
    pub fn with_session(session: BrowserSession) -> Self {
        Self { session: Arc::new(Mutex::new(session)), options: ExportOptions::new(), tool_router: Self::tool_router() }
    }

    /// Export defaults applied to every export_playlist call
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn export_options(&self) -> &ExportOptions {
        &self.options
    }

    pub(crate) fn session(&self) -> MutexGuard<'_, BrowserSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[tool_handler]
impl ServerHandler for BrowserServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Open a Deezer playlist or album with browser_navigate, then call export_playlist to scroll \
                 the track list and write it to CSV. export_history lists recent exports."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
