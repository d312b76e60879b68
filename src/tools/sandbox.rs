//! Path containment for the working-directory sandbox.
//!
//! Every tool re-validates its target through [`resolve`] before touching
//! the filesystem. Containment is checked segment-wise (`Path::starts_with`),
//! so a workspace of `/a/b` does not admit `/a/bc`.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Target path escapes the working directory.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("\"{0}\" is outside the working directory")]
pub struct SandboxViolation(pub String);

/// Resolve `candidate` against the workspace root, rejecting anything that
/// escapes it.
///
/// The join is normalized lexically (`.` and `..` folded) rather than via
/// `canonicalize`, because write targets may not exist yet. The workspace
/// itself is canonicalized at config load.
pub fn resolve(workspace: &Path, candidate: &str) -> Result<PathBuf, SandboxViolation> {
    let joined = workspace.join(candidate);
    let normalized = normalize(&joined);
    if normalized.starts_with(workspace) {
        Ok(normalized)
    } else {
        Err(SandboxViolation(candidate.to_string()))
    }
}

/// Fold `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the root leaves the root in place; the
                // containment check rejects the result.
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
