//! Python script execution tool.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;

use super::{sandbox, Tool};

/// Run a Python file inside the workspace.
pub struct RunPythonFile {
    timeout: Duration,
}

impl RunPythonFile {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }

    #[cfg(test)]
    fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for RunPythonFile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for RunPythonFile {
    fn name(&self) -> &str {
        "run_python_file"
    }

    fn description(&self) -> &str {
        "Run a Python file with optional arguments, capturing stdout and stderr. Only .py files inside the working directory can be run."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the Python file to execute, relative to the working directory."
                },
                "args": {
                    "type": "array",
                    "items": {
                        "type": "string"
                    },
                    "description": "Optional arguments to pass to the Python file."
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String> {
        let file_path = args["file_path"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'file_path' argument"))?;
        let extra_args: Vec<String> = args["args"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let path = sandbox::resolve(workspace, file_path)?;

        // Extension check before anything is spawned.
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            anyhow::bail!("\"{}\" is not a Python file", file_path);
        }

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            anyhow::bail!("\"{}\" is not a valid file or not found", file_path);
        }

        tracing::info!("Executing Python file: {}", file_path);

        let output = tokio::time::timeout(
            self.timeout,
            Command::new("python3")
                .arg(&path)
                .args(&extra_args)
                .current_dir(workspace)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "Executing \"{}\" timed out after {} seconds",
                file_path,
                self.timeout.as_secs()
            )
        })?
        .map_err(|e| anyhow::anyhow!("Failed to execute \"{}\": {}", file_path, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut sections = Vec::new();
        if !stdout.is_empty() {
            sections.push(format!("STDOUT:\n{}", stdout));
        }
        if !stderr.is_empty() {
            sections.push(format!("STDERR:\n{}", stderr));
        }
        if let Some(code) = output.status.code() {
            if code != 0 {
                sections.push(format!("Process exited with code {}", code));
            }
        }

        if sections.is_empty() {
            Ok("No output produced.".to_string())
        } else {
            Ok(sections.join("\n"))
        }
    }
}
