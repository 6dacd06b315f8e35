//! Bridge - the capability object handed to lower-trust code.
//!
//! A `Bridge` is built once when the context is set up and exposes exactly
//! three operations: read a file, write a file, and subscribe to updates.
//! Each call is forwarded unmodified over a fixed channel; the bridge does
//! no validation, retries or recovery of its own.
//!
//! The update payload type is a parameter so subscribers get typed values
//! instead of raw JSON.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::types::{ApiError, FileUpdate, ReadFileArgs, WriteFileArgs};
use crate::ipc::channel::Channel;
use crate::ipc::main_process::IpcMain;
use crate::ipc::renderer::IpcRenderer;

/// Names of every capability reachable through a bridge.
pub const CAPABILITIES: [&str; 3] = ["readFile", "writeFile", "onUpdate"];

/// Restricted capability set exposed to a sandboxed context.
pub struct Bridge<U = FileUpdate> {
    ipc: IpcRenderer,
    _payload: PhantomData<fn() -> U>,
}

impl<U> Bridge<U> {
    /// Build the capability object on top of a privileged endpoint.
    pub fn expose(ipc: &std::sync::Arc<IpcMain>) -> Self {
        log::debug!("Exposing bridge: capabilities={:?}", CAPABILITIES);
        Self {
            ipc: ipc.renderer(),
            _payload: PhantomData,
        }
    }

    /// Read a text file through the privileged side.
    ///
    /// # Errors
    /// Whatever the `read-file` handler fails with, unchanged. A response that
    /// is not a string becomes `ApiError::PayloadDecode`.
    pub async fn read_file(&self, path: impl Into<String>) -> Result<String, ApiError> {
        let args = ReadFileArgs { path: path.into() };
        let response = self
            .ipc
            .invoke(Channel::ReadFile, encode(Channel::ReadFile, &args)?)
            .await?;

        match response {
            Value::String(content) => Ok(content),
            other => Err(ApiError::PayloadDecode {
                channel: Channel::ReadFile.as_str().to_string(),
                message: format!("expected text content, got {other}"),
            }),
        }
    }

    /// Write a text file through the privileged side.
    ///
    /// Resolves with no payload once the handler reports completion.
    pub async fn write_file(
        &self,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), ApiError> {
        let args = WriteFileArgs {
            path: path.into(),
            content: content.into(),
        };
        self.ipc
            .invoke(Channel::WriteFile, encode(Channel::WriteFile, &args)?)
            .await?;
        Ok(())
    }
}

impl<U: DeserializeOwned + 'static> Bridge<U> {
    /// Register a callback for every emission on the `update` channel.
    ///
    /// Listeners accumulate for the lifetime of the bridge's endpoint; there
    /// is no unregistration. Emissions that do not decode into `U` are skipped
    /// for this callback.
    pub fn on_update<F>(&self, callback: F)
    where
        F: Fn(U) + Send + Sync + 'static,
    {
        self.ipc.on(Channel::Update, move |payload| {
            match U::deserialize(payload) {
                Ok(update) => callback(update),
                Err(e) => log::warn!("Skipping undecodable update payload: {e}"),
            }
        });
    }
}

impl<U> std::fmt::Debug for Bridge<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("capabilities", &CAPABILITIES)
            .finish_non_exhaustive()
    }
}

fn encode<T: serde::Serialize>(channel: Channel, args: &T) -> Result<Value, ApiError> {
    serde_json::to_value(args).map_err(|e| ApiError::PayloadDecode {
        channel: channel.as_str().to_string(),
        message: e.to_string(),
    })
}
