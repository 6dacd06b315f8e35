//! FileHost - privileged handlers behind the bridge channels.
//!
//! Decodes the request arguments arriving on `read-file` / `write-file`,
//! runs them against an [`FsManager`], and announces completed writes on the
//! `update` channel.

use std::sync::{Arc, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::types::{ApiError, FileUpdate, ReadFileArgs, UpdateKind, WriteFileArgs};
use crate::ipc::channel::Channel;
use crate::ipc::main_process::{InvokeHandler, IpcMain};
use crate::runtime::fs::FsManager;

/// Privileged side of the file bridge.
pub struct FileHost {
    fs: FsManager,
    // Weak: the endpoint owns the handlers, which own the host.
    ipc: Weak<IpcMain>,
    notify_on_write: bool,
}

impl FileHost {
    /// Create a host and install its handlers on `ipc`.
    ///
    /// # Errors
    /// * `ApiError::HandlerAlreadyRegistered` - If another host already serves the channels
    pub fn register(
        ipc: &Arc<IpcMain>,
        fs: FsManager,
        notify_on_write: bool,
    ) -> Result<Arc<Self>, ApiError> {
        let host = Arc::new(Self {
            fs,
            ipc: Arc::downgrade(ipc),
            notify_on_write,
        });

        ipc.handle(
            Channel::ReadFile,
            Arc::new(ReadFileHandler {
                host: Arc::clone(&host),
            }),
        )?;
        if let Err(e) = ipc.handle(
            Channel::WriteFile,
            Arc::new(WriteFileHandler {
                host: Arc::clone(&host),
            }),
        ) {
            ipc.remove_handler(Channel::ReadFile);
            return Err(e);
        }

        log::info!(
            "File host registered: root={}, notify_on_write={notify_on_write}",
            host.fs.workspace_root().display()
        );
        Ok(host)
    }

    /// Emit an update to every subscriber. Returns how many were reached.
    pub fn notify(&self, update: &FileUpdate) -> usize {
        let Some(ipc) = self.ipc.upgrade() else {
            log::warn!("Dropping update for {}: endpoint is gone", update.path);
            return 0;
        };
        match serde_json::to_value(update) {
            Ok(payload) => ipc.send(Channel::Update, payload),
            Err(e) => {
                log::warn!("Dropping unserializable update for {}: {e}", update.path);
                0
            }
        }
    }

    /// Announce an out-of-band change to a file.
    pub fn notify_changed(&self, path: impl Into<String>) -> usize {
        self.notify(&FileUpdate {
            kind: UpdateKind::Changed,
            path: path.into(),
            bytes_written: 0.0,
            at_ms: now_ms(),
        })
    }

    async fn read(&self, args: ReadFileArgs) -> Result<String, ApiError> {
        self.fs.read_text_file(&args.path).await
    }

    async fn write(&self, args: WriteFileArgs) -> Result<(), ApiError> {
        let bytes_written = self.fs.write_text_file(&args.path, &args.content).await?;

        if self.notify_on_write {
            self.notify(&FileUpdate {
                kind: UpdateKind::Written,
                path: args.path,
                bytes_written: bytes_written as f64,
                at_ms: now_ms(),
            });
        }
        Ok(())
    }
}

struct ReadFileHandler {
    host: Arc<FileHost>,
}

#[async_trait]
impl InvokeHandler for ReadFileHandler {
    async fn handle(&self, payload: Value) -> Result<Value, ApiError> {
        let args: ReadFileArgs = decode(Channel::ReadFile, payload)?;
        self.host.read(args).await.map(Value::String)
    }
}

struct WriteFileHandler {
    host: Arc<FileHost>,
}

#[async_trait]
impl InvokeHandler for WriteFileHandler {
    async fn handle(&self, payload: Value) -> Result<Value, ApiError> {
        let args: WriteFileArgs = decode(Channel::WriteFile, payload)?;
        self.host.write(args).await?;
        Ok(Value::Null)
    }
}

/// Request args travel as named objects; positional arrays are refused.
fn decode<T: DeserializeOwned>(channel: Channel, payload: Value) -> Result<T, ApiError> {
    if !payload.is_object() {
        return Err(ApiError::PayloadDecode {
            channel: channel.as_str().to_string(),
            message: "expected an object of named arguments".to_string(),
        });
    }
    serde_json::from_value(payload).map_err(|e| ApiError::PayloadDecode {
        channel: channel.as_str().to_string(),
        message: e.to_string(),
    })
}

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
