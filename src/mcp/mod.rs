//! MCP (Model Context Protocol) server for playlist export
//!
//! The rmcp tools here are thin wrappers around the [`ToolRegistry`](crate::tools::ToolRegistry).

pub mod handler;
pub use handler::BrowserServer;

use crate::error::BrowserError;
use crate::tools::{ExportHistoryParams, ExportPlaylistParams, NavigateParams, ToolContext, ToolResult as InternalToolResult};
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    tool, tool_router,
};
use serde::Serialize;

/// Convert internal ToolResult to MCP CallToolResult
fn convert_result(result: InternalToolResult) -> Result<CallToolResult, McpError> {
    if result.success {
        let text = if let Some(data) = result.data {
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
        } else {
            "Success".to_string()
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    } else {
        let error_msg = result.error.unwrap_or_else(|| "Unknown error".to_string());
        Err(McpError::invalid_params(error_msg, result.data))
    }
}

fn convert_error(error: BrowserError) -> McpError {
    match error {
        BrowserError::InvalidArgument(_) | BrowserError::NotTargetPage { .. } => {
            McpError::invalid_params(error.to_string(), None)
        }
        _ => McpError::internal_error(error.to_string(), None),
    }
}

impl BrowserServer {
    fn run_tool<P: Serialize>(&self, name: &str, params: P) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let mut context = ToolContext::with_options(&session, self.export_options().clone());

        let params = serde_json::to_value(params).map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let result = session.tool_registry().execute(name, params, &mut context).map_err(convert_error)?;

        convert_result(result)
    }
}

#[tool_router]
impl BrowserServer {
    /// Navigate to a URL
    #[tool(description = "Open a Deezer playlist or album page in the browser")]
    fn browser_navigate(&self, params: Parameters<NavigateParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("navigate", params.0)
    }

    /// Scroll the current page and export its tracks
    #[tool(
        description = "Scroll the open Deezer playlist or album until every track has been rendered, then write the tracks to a CSV file"
    )]
    fn export_playlist(&self, params: Parameters<ExportPlaylistParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("export_playlist", params.0)
    }

    /// List recent exports
    #[tool(description = "List the most recent playlist exports, newest first")]
    fn export_history(&self, params: Parameters<ExportHistoryParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("export_history", params.0)
    }
}
