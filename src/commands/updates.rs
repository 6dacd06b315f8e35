//! Update forwarding from the bridge to the webview.
//!
//! Subscribes once to the bridge's `update` channel at setup time and
//! re-emits each payload as a Tauri event with the same name.

use tauri::{AppHandle, Emitter, Runtime};

use crate::api::types::{ApiError, FileUpdate};
use crate::bridge::Bridge;
use crate::ipc::channel::CHANNEL_UPDATE;

/// Destination for forwarded updates.
pub trait UpdateEmitter: Send + Sync + 'static {
    fn emit_update(&self, update: &FileUpdate) -> Result<(), ApiError>;
}

impl<R: Runtime> UpdateEmitter for AppHandle<R> {
    fn emit_update(&self, update: &FileUpdate) -> Result<(), ApiError> {
        self.emit(CHANNEL_UPDATE, update)
            .map_err(|e| ApiError::IoError {
                message: format!("Failed to emit {CHANNEL_UPDATE} event: {e}"),
            })
    }
}

/// Forward every bridge update to `emitter`. Emission failures are logged.
pub fn forward_updates<E: UpdateEmitter>(bridge: &Bridge, emitter: E) {
    bridge.on_update(move |update: FileUpdate| {
        if let Err(e) = emitter.emit_update(&update) {
            log::error!("{e} (path={})", update.path);
        } else {
            log::trace!("Emitted {CHANNEL_UPDATE}: path={}", update.path);
        }
    });
}
