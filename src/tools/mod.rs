//! Typed tool system
//!
//! Every high-level operation (navigate, export, history) is a [`Tool`] with
//! serde/schemars-typed parameters. The [`ToolRegistry`] dispatches JSON
//! calls by name, which is what the MCP server and
//! [`BrowserSession::execute_tool`](crate::BrowserSession::execute_tool) use.

pub mod export;
pub mod history;
pub mod navigate;
pub mod utils;

pub use export::{ExportPlaylistParams, ExportPlaylistTool};
pub use history::{ExportHistoryParams, ExportHistoryTool};
pub use navigate::{NavigateParams, NavigateTool};

use crate::browser::BrowserSession;
use crate::error::{BrowserError, Result};
use crate::export::ExportOptions;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Outcome of a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success() -> Self {
        Self { success: true, data: None, error: None }
    }

    pub fn success_with(data: serde_json::Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }

    /// Failure that still carries structured details
    pub fn failure_with(error: impl Into<String>, data: serde_json::Value) -> Self {
        Self { success: false, data: Some(data), error: Some(error.into()) }
    }
}

/// What a tool can reach while it runs
pub struct ToolContext<'a> {
    pub session: &'a BrowserSession,
    pub options: ExportOptions,
}

impl<'a> ToolContext<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session, options: ExportOptions::new() }
    }

    pub fn with_options(session: &'a BrowserSession, options: ExportOptions) -> Self {
        Self { session, options }
    }
}

/// A named operation with typed parameters
pub trait Tool: Send + Sync {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    /// JSON schema of the parameters
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or_default()
    }

    /// Deserialize JSON parameters and run
    fn execute(&self, params: serde_json::Value, context: &mut ToolContext) -> Result<ToolResult> {
        let params: Self::Params = serde_json::from_value(params).map_err(|e| BrowserError::InvalidArgument(format!(
            "Invalid parameters for '{}': {}",
            self.name(),
            e
        )))?;
        self.execute_typed(params, context)
    }
}

/// Object-safe view of a [`Tool`]
trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;
    fn execute(&self, params: serde_json::Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn parameters_schema(&self) -> serde_json::Value {
        Tool::parameters_schema(self)
    }

    fn execute(&self, params: serde_json::Value, context: &mut ToolContext) -> Result<ToolResult> {
        Tool::execute(self, params, context)
    }
}

/// Tools by name, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in tool
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NavigateTool);
        registry.register(ExportPlaylistTool);
        registry.register(ExportHistoryTool);
        registry
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn schema(&self, name: &str) -> Option<serde_json::Value> {
        self.tools.get(name).map(|t| t.parameters_schema())
    }

    pub fn execute(&self, name: &str, params: serde_json::Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self.tools.get(name).ok_or_else(|| BrowserError::ToolExecutionFailed {
            tool: name.to_string(),
            reason: "Unknown tool".to_string(),
        })?;

        tool.execute(params, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = ToolRegistry::with_defaults();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["navigate", "export_playlist", "export_history"]);
        assert!(registry.has("export_playlist"));
        assert!(!registry.has("click"));
    }

    #[test]
    fn test_registry_schema() {
        let registry = ToolRegistry::with_defaults();
        let schema = registry.schema("navigate").unwrap();
        assert!(schema.is_object());
        assert!(registry.schema("missing").is_none());
    }

    #[test]
    fn test_tool_result_constructors() {
        assert!(ToolResult::success().success);
        let failure = ToolResult::failure("nope");
        assert!(!failure.success);
        assert_eq!(failure.error.as_deref(), Some("nope"));

        let json = serde_json::to_value(ToolResult::success_with(serde_json::json!({"n": 1}))).unwrap();
        assert_eq!(json["data"]["n"], 1);
        assert!(json.get("error").is_none());
    }
}
