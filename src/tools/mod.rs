//! Tool registry and dispatch.
//!
//! Tools are registered once at startup and never mutated afterwards. The
//! registry is exposed in two forms: the full declarations advertised to
//! the model, and a name lookup used to dispatch incoming function calls.
//! Dispatch never lets a tool failure escape; every outcome is folded into
//! a function-response part the model can read.

pub mod fs;
pub mod python;
pub mod sandbox;

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::{FunctionCall, FunctionDeclaration, FunctionResponse, Part};

use self::fs::{ListFiles, ReadFile, WriteFile};
use self::python::RunPythonFile;

/// A single agent tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, as advertised to the model.
    fn name(&self) -> &str;

    /// Human-readable description for the model.
    fn description(&self) -> &str;

    /// JSON schema describing the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool. The workspace root is injected here, never
    /// supplied by the model.
    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String>;
}

/// Tool metadata for building the system prompt.
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Registry of all available tools.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a registry with all built-in tools.
    pub fn new() -> Self {
        Self {
            tools: vec![
                Box::new(ListFiles),
                Box::new(ReadFile),
                Box::new(RunPythonFile::new()),
                Box::new(WriteFile),
            ],
        }
    }

    /// Names and descriptions of all registered tools.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Full declarations advertised to the model.
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        self.tools
            .iter()
            .map(|t| FunctionDeclaration {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Dispatch one model-issued function call.
    ///
    /// The result is always a function-response part addressed back to the
    /// calling tool name; unknown tools and tool failures become error
    /// payloads rather than faults, so a single failed call cannot take
    /// down the conversation loop.
    pub async fn dispatch(&self, call: &FunctionCall, workspace: &Path, verbose: bool) -> Part {
        if verbose {
            println!("Calling function: {}({})", call.name, call.args);
        } else {
            println!(" - Calling function: {}", call.name);
        }

        let response = match self.get(&call.name) {
            None => json!({"error": format!("Unknown function: {}", call.name)}),
            Some(tool) => {
                tracing::debug!(tool = call.name, "dispatching tool call");
                match tool.execute(call.args.clone(), workspace).await {
                    Ok(output) => json!({"result": output}),
                    Err(e) => json!({"error": format!("Error: {}", e)}),
                }
            }
        };

        Part::FunctionResponse(FunctionResponse {
            name: call.name.clone(),
            response,
        })
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
