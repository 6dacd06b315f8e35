//! FsManager - text file access scoped to a workspace root.
//!
//! Backs the `read-file` and `write-file` handlers. Writes go through a
//! temp file in the target's directory and a rename, so readers never see a
//! partially written file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

use crate::api::types::ApiError;
use crate::config::DEFAULT_MAX_READ_BYTES;
use crate::runtime::path::{resolve_path_in_workspace, resolve_write_target_in_workspace};

/// File manager for one workspace root.
#[derive(Debug, Clone)]
pub struct FsManager {
    workspace_root: PathBuf,
    max_read_bytes: u64,
}

impl FsManager {
    /// Create a manager with the default read limit.
    pub fn new(workspace_root: PathBuf) -> Self {
        Self::with_read_limit(workspace_root, DEFAULT_MAX_READ_BYTES)
    }

    pub fn with_read_limit(workspace_root: PathBuf, max_read_bytes: u64) -> Self {
        Self {
            workspace_root,
            max_read_bytes,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Read a UTF-8 text file inside the workspace.
    ///
    /// # Errors
    /// * `ApiError::InvalidInput` - Not a file, over the read limit, not UTF-8, or outside the root
    /// * `ApiError::PathNotFound` - The file does not exist
    /// * `ApiError::IoError` - The file could not be read
    pub async fn read_text_file(&self, path: &str) -> Result<String, ApiError> {
        let resolved = resolve_path_in_workspace(&self.workspace_root, path)?;

        let metadata = fs::metadata(&resolved).await.map_err(|e| io_error(path, "stat", e))?;
        if !metadata.is_file() {
            return Err(ApiError::InvalidInput {
                message: format!("Path is not a file: {path}"),
            });
        }
        if metadata.len() > self.max_read_bytes {
            return Err(ApiError::InvalidInput {
                message: format!(
                    "File too large to read: {path} ({} bytes, max {})",
                    metadata.len(),
                    self.max_read_bytes
                ),
            });
        }

        let file = fs::File::open(&resolved)
            .await
            .map_err(|e| io_error(path, "open", e))?;
        let bytes = read_bounded(file, self.max_read_bytes)
            .await
            .map_err(|e| io_error(path, "read", e))?
            .ok_or_else(|| ApiError::InvalidInput {
                message: format!(
                    "File too large to read: {path} (over max {})",
                    self.max_read_bytes
                ),
            })?;
        log::debug!("Read {} bytes: path={path}", bytes.len());

        String::from_utf8(bytes).map_err(|_| ApiError::InvalidInput {
            message: format!("File is not valid UTF-8 text: {path}"),
        })
    }

    /// Replace (or create) a text file inside the workspace.
    ///
    /// # Returns
    /// Number of bytes written.
    pub async fn write_text_file(&self, path: &str, content: &str) -> Result<u64, ApiError> {
        let target = resolve_write_target_in_workspace(&self.workspace_root, path)?;

        match fs::symlink_metadata(&target).await {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                return Err(ApiError::InvalidInput {
                    message: format!("Path is a symlink: {path}"),
                });
            }
            Ok(metadata) if metadata.is_dir() => {
                return Err(ApiError::InvalidInput {
                    message: format!("Path is a directory: {path}"),
                });
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(path, "stat", e)),
        }

        let parent = target.parent().ok_or_else(|| ApiError::InvalidInput {
            message: format!("Path must include a parent directory: {path}"),
        })?;
        let staging = parent.join(format!(".filebridge_{}.tmp", Uuid::new_v4()));

        if let Err(e) = stage_content(&staging, content).await {
            let _ = fs::remove_file(&staging).await;
            return Err(io_error(path, "stage", e));
        }

        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(io_error(path, "replace", e));
        }

        log::debug!("Wrote {} bytes: path={path}", content.len());
        Ok(content.len() as u64)
    }
}

/// Read at most `max` bytes. `None` when the source holds more, which covers a
/// file that grew after its size was checked.
async fn read_bounded<R>(reader: R, max: u64) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader.take(max.saturating_add(1)).read_to_end(&mut bytes).await?;
    if bytes.len() as u64 > max {
        return Ok(None);
    }
    Ok(Some(bytes))
}

async fn stage_content(staging: &Path, content: &str) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(staging)
        .await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    file.sync_all().await
}

fn io_error(path: &str, action: &str, e: std::io::Error) -> ApiError {
    if e.kind() == ErrorKind::NotFound {
        return ApiError::PathNotFound {
            path: path.to_string(),
        };
    }
    ApiError::IoError {
        message: format!("Failed to {action} '{path}': {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    async fn make_root() -> PathBuf {
        let root = env::temp_dir().join(format!("fs_root_{}", Uuid::new_v4()));
        fs::create_dir_all(&root)
            .await
            .expect("failed to create root dir");
        root
    }

    #[tokio::test]
    async fn test_read_text_file_success() {
        let root = make_root().await;
        fs::write(root.join("hello.txt"), "hello world")
            .await
            .expect("failed to write file");

        let manager = FsManager::new(root.clone());
        assert_eq!(manager.read_text_file("hello.txt").await.unwrap(), "hello world");

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }

    #[tokio::test]
    async fn test_read_text_file_rejects_directory() {
        let root = make_root().await;
        fs::create_dir_all(root.join("nested"))
            .await
            .expect("failed to create nested dir");

        let manager = FsManager::new(root.clone());
        let result = manager.read_text_file("nested").await;
        assert!(matches!(result, Err(ApiError::InvalidInput { .. })));

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }

    #[tokio::test]
    async fn test_read_text_file_respects_limit() {
        let root = make_root().await;
        fs::write(root.join("big.txt"), vec![b'a'; 17])
            .await
            .expect("failed to write file");

        let manager = FsManager::with_read_limit(root.clone(), 16);
        let result = manager.read_text_file("big.txt").await;
        assert!(matches!(result, Err(ApiError::InvalidInput { .. })));

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }

    #[tokio::test]
    async fn test_read_bounded_stops_past_limit() {
        let exact = read_bounded(&b"0123456789abcdef"[..], 16).await.unwrap();
        assert_eq!(exact.as_deref(), Some(&b"0123456789abcdef"[..]));

        let over = read_bounded(&b"0123456789abcdefg"[..], 16).await.unwrap();
        assert_eq!(over, None);

        let empty = read_bounded(&b""[..], 16).await.unwrap();
        assert_eq!(empty, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_read_text_file_at_limit() {
        let root = make_root().await;
        fs::write(root.join("edge.txt"), vec![b'a'; 16])
            .await
            .expect("failed to write file");

        let manager = FsManager::with_read_limit(root.clone(), 16);
        let content = manager.read_text_file("edge.txt").await.unwrap();
        assert_eq!(content.len(), 16);

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }

    #[tokio::test]
    async fn test_read_text_file_rejects_binary() {
        let root = make_root().await;
        fs::write(root.join("blob.bin"), [0xff, 0xfe, 0x00])
            .await
            .expect("failed to write file");

        let manager = FsManager::new(root.clone());
        let result = manager.read_text_file("blob.bin").await;
        assert!(matches!(result, Err(ApiError::InvalidInput { .. })));

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let root = make_root().await;
        let manager = FsManager::new(root.clone());
        let result = manager.read_text_file("absent.txt").await;
        assert!(matches!(result, Err(ApiError::PathNotFound { .. })));

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }

    #[tokio::test]
    async fn test_write_creates_and_replaces() {
        let root = make_root().await;
        let manager = FsManager::new(root.clone());

        assert_eq!(manager.write_text_file("notes.txt", "first").await.unwrap(), 5);
        assert_eq!(
            manager.write_text_file("notes.txt", "second!").await.unwrap(),
            7
        );

        let content = fs::read_to_string(root.join("notes.txt"))
            .await
            .expect("failed to read written file");
        assert_eq!(content, "second!");

        // No staging files left behind.
        let mut entries = fs::read_dir(&root).await.expect("failed to list root");
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.expect("failed to read entry") {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["notes.txt".to_string()]);

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }

    #[tokio::test]
    async fn test_write_rejects_directory() {
        let root = make_root().await;
        fs::create_dir_all(root.join("nested"))
            .await
            .expect("failed to create nested dir");

        let manager = FsManager::new(root.clone());
        let result = manager.write_text_file("nested", "data").await;
        assert!(matches!(result, Err(ApiError::InvalidInput { .. })));

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_rejects_symlink() {
        let root = make_root().await;
        fs::write(root.join("real.txt"), "real")
            .await
            .expect("failed to write file");
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt"))
            .expect("failed to create symlink");

        let manager = FsManager::new(root.clone());
        let result = manager.write_text_file("link.txt", "data").await;
        assert!(matches!(result, Err(ApiError::InvalidInput { .. })));

        fs::remove_dir_all(&root)
            .await
            .expect("failed to remove root dir");
    }
}
