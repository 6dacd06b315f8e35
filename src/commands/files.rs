//! File commands for the webview.
//!
//! The webview gets the same three capabilities as any in-process guest:
//! `read_file` and `write_file` forward through the managed [`Bridge`], and
//! updates arrive as `update` events (see `commands::updates`).

use tauri::State;

use crate::api::types::ApiError;
use crate::bridge::Bridge;

async fn read_file_inner(bridge: &Bridge, path: String) -> Result<String, ApiError> {
    log::info!("read_file called: path={path}");
    bridge.read_file(path).await
}

async fn write_file_inner(bridge: &Bridge, path: String, content: String) -> Result<(), ApiError> {
    log::info!("write_file called: path={path}, len={}", content.len());
    bridge.write_file(path, content).await
}

/// Read a text file through the bridge.
///
/// # Arguments
/// * `path` - Path relative to the workspace root, or absolute inside it
///
/// # Errors
/// * `ApiError::PathNotFound` - If the file does not exist
/// * `ApiError::InvalidInput` - If the path escapes the workspace or is not a readable text file
/// * `ApiError::IoError` - If the file cannot be read
#[tauri::command]
#[specta::specta]
pub async fn read_file(bridge: State<'_, Bridge>, path: String) -> Result<String, ApiError> {
    read_file_inner(bridge.inner(), path).await
}

/// Write a text file through the bridge.
///
/// # Events Emitted
/// * `update` - After the write completes, when write notifications are enabled
#[tauri::command]
#[specta::specta]
pub async fn write_file(
    bridge: State<'_, Bridge>,
    path: String,
    content: String,
) -> Result<(), ApiError> {
    write_file_inner(bridge.inner(), path, content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::channel::Channel;
    use crate::ipc::main_process::{handler_fn, IpcMain};
    use serde_json::json;

    #[tokio::test]
    async fn test_read_file_inner_forwards_to_host() {
        let ipc = IpcMain::new();
        ipc.handle(
            Channel::ReadFile,
            handler_fn(|payload| async move {
                assert_eq!(payload, json!({ "path": "/tmp/a.txt" }));
                Ok(json!("hello"))
            }),
        )
        .unwrap();
        let bridge: Bridge = Bridge::expose(&ipc);

        let content = read_file_inner(&bridge, "/tmp/a.txt".to_string())
            .await
            .unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn test_write_file_inner_without_host() {
        let ipc = IpcMain::new();
        let bridge: Bridge = Bridge::expose(&ipc);

        let result = write_file_inner(&bridge, "a.txt".to_string(), "x".to_string()).await;
        assert!(matches!(result, Err(ApiError::ChannelNotHandled { .. })));
    }
}
