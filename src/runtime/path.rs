//! Path scoping for the privileged file handlers.
//!
//! Every path that arrives over the bridge is resolved against the workspace
//! root and rejected if the resolved location leaves it.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::api::types::ApiError;

/// Canonicalizes and validates a workspace root directory.
///
/// # Errors
/// * `ApiError::InvalidInput` - If the root is empty
/// * `ApiError::PathNotFound` - If the root does not exist
/// * `ApiError::PathNotDirectory` - If the root is not a directory
pub fn canonicalize_workspace_root(root: &str) -> Result<PathBuf, ApiError> {
    if root.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            message: "Workspace root cannot be empty".to_string(),
        });
    }

    let path = Path::new(root);
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ApiError::PathNotFound {
            path: root.to_string(),
        },
        _ => ApiError::IoError {
            message: format!("Failed to read metadata for '{root}': {e}"),
        },
    })?;

    if !metadata.is_dir() {
        return Err(ApiError::PathNotDirectory {
            path: root.to_string(),
        });
    }

    path.canonicalize().map_err(|e| ApiError::IoError {
        message: format!("Failed to canonicalize path '{root}': {e}"),
    })
}

/// Resolve an existing path inside the workspace root.
///
/// Relative inputs are joined onto the root; absolute inputs are accepted when
/// they resolve under it. Symlinks are followed before the boundary check.
pub fn resolve_path_in_workspace(root: &Path, input: &str) -> Result<PathBuf, ApiError> {
    let root = canonical_root(root)?;
    let candidate = candidate_path(&root, input)?;

    let resolved = candidate.canonicalize().map_err(|e| {
        if e.kind() != ErrorKind::NotFound {
            return ApiError::IoError {
                message: format!("Failed to canonicalize path '{input}': {e}"),
            };
        }
        // A missing absolute path outside the root is still an escape attempt.
        if candidate.is_absolute() && !candidate.starts_with(&root) {
            escape_error(input)
        } else {
            ApiError::PathNotFound {
                path: input.to_string(),
            }
        }
    })?;

    ensure_within(&root, &resolved, input)?;
    Ok(resolved)
}

/// Resolve a write target inside the workspace root.
///
/// The target itself may not exist yet, so only its parent is canonicalized.
/// The final component must be a plain file name.
pub fn resolve_write_target_in_workspace(root: &Path, input: &str) -> Result<PathBuf, ApiError> {
    let root = canonical_root(root)?;
    let candidate = candidate_path(&root, input)?;

    let file_name = match candidate.components().next_back() {
        Some(Component::Normal(name)) => name.to_os_string(),
        _ => {
            return Err(ApiError::InvalidInput {
                message: format!("Path must name a file: {input}"),
            })
        }
    };

    let parent = candidate.parent().ok_or_else(|| ApiError::InvalidInput {
        message: format!("Path must include a parent directory: {input}"),
    })?;

    let parent = parent.canonicalize().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            if parent.starts_with(&root) {
                ApiError::PathNotFound {
                    path: parent.display().to_string(),
                }
            } else {
                escape_error(input)
            }
        } else {
            ApiError::IoError {
                message: format!("Failed to canonicalize parent of '{input}': {e}"),
            }
        }
    })?;

    ensure_within(&root, &parent, input)?;
    if !parent.is_dir() {
        return Err(ApiError::PathNotDirectory {
            path: parent.display().to_string(),
        });
    }
    Ok(parent.join(file_name))
}

fn canonical_root(root: &Path) -> Result<PathBuf, ApiError> {
    root.canonicalize().map_err(|e| ApiError::IoError {
        message: format!(
            "Failed to canonicalize workspace root '{}': {e}",
            root.display()
        ),
    })
}

fn candidate_path(root: &Path, input: &str) -> Result<PathBuf, ApiError> {
    if input.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            message: "Path cannot be empty".to_string(),
        });
    }

    let input_path = Path::new(input);
    if input_path.is_absolute() {
        Ok(input_path.to_path_buf())
    } else {
        Ok(root.join(input_path))
    }
}

fn ensure_within(root: &Path, resolved: &Path, input: &str) -> Result<(), ApiError> {
    if resolved.starts_with(root) {
        Ok(())
    } else {
        Err(escape_error(input))
    }
}

fn escape_error(input: &str) -> ApiError {
    ApiError::InvalidInput {
        message: format!("Path escapes workspace root: {input}"),
    }
}
