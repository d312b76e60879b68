//! File inspection and editing tools.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{sandbox, Tool};

/// Character cap on file content returned to the model.
const MAX_READ_CHARS: usize = 10_000;

/// List the direct children of a directory.
pub struct ListFiles;

#[async_trait]
impl Tool for ListFiles {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List the files in the given directory along with their sizes in bytes and whether each entry is a directory."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory to list, relative to the working directory. Defaults to the working directory itself."
                }
            }
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String> {
        let directory = args["directory"].as_str().unwrap_or(".");
        let path = sandbox::resolve(workspace, directory)?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| anyhow::anyhow!("\"{}\" is not a valid directory", directory))?;
        if !metadata.is_dir() {
            anyhow::bail!("\"{}\" is not a directory", directory);
        }

        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(&path).await?;
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let meta = entry.metadata().await?;
            entries.push(format!(
                "- {}: file_size={} bytes, is_dir={}",
                name,
                meta.len(),
                meta.is_dir()
            ));
        }
        // Directory iteration order is platform-defined; sort for stable output.
        entries.sort();

        if entries.is_empty() {
            Ok(format!("\"{}\" is empty", directory))
        } else {
            Ok(entries.join("\n"))
        }
    }
}

/// Read a file's content, capped at [`MAX_READ_CHARS`] characters.
pub struct ReadFile;

#[async_trait]
impl Tool for ReadFile {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the content of a text file, truncated to 10000 characters."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the file to read, relative to the working directory."
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String> {
        let file_path = args["file_path"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'file_path' argument"))?;
        let path = sandbox::resolve(workspace, file_path)?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| anyhow::anyhow!("\"{}\" is not a valid file or not found", file_path))?;
        if metadata.is_dir() {
            anyhow::bail!("\"{}\" is a directory, not a file", file_path);
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot read \"{}\" as text: {}", file_path, e))?;

        Ok(truncate_content(&content, file_path))
    }
}

fn truncate_content(content: &str, file_path: &str) -> String {
    match content.char_indices().nth(MAX_READ_CHARS) {
        Some((cut, _)) => format!(
            "{}[...File \"{}\" truncated at {} characters]",
            &content[..cut],
            file_path,
            MAX_READ_CHARS
        ),
        None => content.to_string(),
    }
}

/// Create or overwrite a file.
pub struct WriteFile;

#[async_trait]
impl Tool for WriteFile {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Create or overwrite a file with the given content, creating parent directories as needed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the file to write, relative to the working directory."
                },
                "content": {
                    "type": "string",
                    "description": "Content to write to the file."
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String> {
        let file_path = args["file_path"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'file_path' argument"))?;
        let content = args["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'content' argument"))?;
        let path = sandbox::resolve(workspace, file_path)?;

        if tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
            anyhow::bail!("\"{}\" is a directory, not a file", file_path);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("Cannot create parent directories: {}", e))?;
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot write \"{}\": {}", file_path, e))?;

        Ok(format!(
            "Successfully wrote to \"{}\" ({} characters written)",
            file_path,
            content.chars().count()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace() -> TempDir {
        tempfile::tempdir().expect("create temp workspace")
    }

    #[tokio::test]
    async fn list_reports_each_entry_with_size_and_dir_flag() {
        let dir = workspace();
        std::fs::write(dir.path().join("a.txt"), "12345").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let output = ListFiles
            .execute(json!({}), dir.path())
            .await
            .expect("list succeeds");

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("a.txt: file_size=5 bytes, is_dir=false"));
        assert!(lines[1].contains("sub:") && lines[1].contains("is_dir=true"));
    }

    #[tokio::test]
    async fn list_rejects_missing_directory() {
        let dir = workspace();
        let err = ListFiles
            .execute(json!({"directory": "nope"}), dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a valid directory"));
    }

    #[tokio::test]
    async fn list_rejects_file_target() {
        let dir = workspace();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        let err = ListFiles
            .execute(json!({"directory": "a.txt"}), dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[tokio::test]
    async fn list_rejects_traversal() {
        let dir = workspace();
        let err = ListFiles
            .execute(json!({"directory": "../../etc"}), dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("outside the working directory"));
    }

    #[tokio::test]
    async fn read_returns_exact_content_under_cap() {
        let dir = workspace();
        std::fs::write(dir.path().join("small.txt"), "hello world").unwrap();

        let output = ReadFile
            .execute(json!({"file_path": "small.txt"}), dir.path())
            .await
            .unwrap();
        assert_eq!(output, "hello world");
    }

    #[tokio::test]
    async fn read_truncates_content_over_cap() {
        let dir = workspace();
        let long = "x".repeat(MAX_READ_CHARS + 500);
        std::fs::write(dir.path().join("big.txt"), &long).unwrap();

        let output = ReadFile
            .execute(json!({"file_path": "big.txt"}), dir.path())
            .await
            .unwrap();
        assert!(output.starts_with(&"x".repeat(MAX_READ_CHARS)));
        assert!(output.ends_with("[...File \"big.txt\" truncated at 10000 characters]"));
        assert!(!output.contains(&"x".repeat(MAX_READ_CHARS + 1)));
    }

    #[tokio::test]
    async fn read_rejects_directory_target() {
        let dir = workspace();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let err = ReadFile
            .execute(json!({"file_path": "sub"}), dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("is a directory"));
    }

    #[tokio::test]
    async fn read_rejects_traversal_without_reading() {
        let dir = workspace();
        let err = ReadFile
            .execute(json!({"file_path": "../../etc/passwd"}), dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("outside the working directory"));
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = workspace();
        let output = WriteFile
            .execute(
                json!({"file_path": "notes/todo.txt", "content": "buy milk"}),
                dir.path(),
            )
            .await
            .unwrap();
        assert!(output.contains("8 characters written"));

        let read_back = ReadFile
            .execute(json!({"file_path": "notes/todo.txt"}), dir.path())
            .await
            .unwrap();
        assert_eq!(read_back, "buy milk");
    }

    #[tokio::test]
    async fn write_overwrites_existing_file() {
        let dir = workspace();
        std::fs::write(dir.path().join("f.txt"), "old").unwrap();

        WriteFile
            .execute(json!({"file_path": "f.txt", "content": "new"}), dir.path())
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("f.txt")).unwrap(), "new");
    }

    #[tokio::test]
    async fn write_rejects_traversal_with_no_side_effect() {
        let dir = workspace();
        let err = WriteFile
            .execute(
                json!({"file_path": "../escape.txt", "content": "x"}),
                dir.path(),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("outside the working directory"));
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }
}
