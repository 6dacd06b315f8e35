//! IpcMain - privileged side of the messaging primitive.
//!
//! Holds one invoke handler per request channel and the listener lists for
//! emission channels. The lower-trust side never touches this type directly;
//! it talks through an [`IpcRenderer`] wrapped inside a bridge.
//!
//! # Flow
//!
//! 1. Privileged code registers handlers with `handle()`
//! 2. A bridge call dispatches through `IpcRenderer::invoke()`
//! 3. The handler's result (or error) is returned unchanged
//! 4. Privileged code calls `send()` to notify every listener on a channel

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::types::ApiError;
use crate::ipc::channel::Channel;
use crate::ipc::renderer::IpcRenderer;

/// Request handler installed for one invokable channel.
#[async_trait]
pub trait InvokeHandler: Send + Sync {
    /// Handle one dispatched payload and produce the response payload.
    async fn handle(&self, payload: Value) -> Result<Value, ApiError>;
}

/// Adapter turning an async closure into an [`InvokeHandler`].
pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> InvokeHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ApiError>> + Send,
{
    async fn handle(&self, payload: Value) -> Result<Value, ApiError> {
        (self.0)(payload).await
    }
}

/// Wrap an async closure as a shareable handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn InvokeHandler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

pub(crate) type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Privileged messaging endpoint.
///
/// Injected into Tauri as managed state and shared with the host via `Arc`.
pub struct IpcMain {
    handlers: RwLock<HashMap<Channel, Arc<dyn InvokeHandler>>>,
    listeners: Mutex<HashMap<Channel, Vec<Listener>>>,
    invoke_counts: Mutex<HashMap<Channel, u64>>,
}

impl IpcMain {
    /// Creates an endpoint with no handlers and no listeners.
    pub fn new() -> Arc<Self> {
        log::debug!("Initializing IpcMain");
        Arc::new(Self {
            handlers: RwLock::new(HashMap::new()),
            listeners: Mutex::new(HashMap::new()),
            invoke_counts: Mutex::new(HashMap::new()),
        })
    }

    /// Register the handler for a request channel.
    ///
    /// # Errors
    /// * `ApiError::InvalidInput` - If the channel is emission-only
    /// * `ApiError::HandlerAlreadyRegistered` - If the channel already has a handler
    pub fn handle(
        &self,
        channel: Channel,
        handler: Arc<dyn InvokeHandler>,
    ) -> Result<(), ApiError> {
        if !channel.is_invokable() {
            return Err(ApiError::InvalidInput {
                message: format!("Channel does not accept requests: {channel}"),
            });
        }

        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        if handlers.contains_key(&channel) {
            return Err(ApiError::HandlerAlreadyRegistered {
                channel: channel.as_str().to_string(),
            });
        }
        handlers.insert(channel, handler);
        log::info!("Handler registered: channel={channel}");
        Ok(())
    }

    /// Remove the handler for a channel. Returns whether one was present.
    pub fn remove_handler(&self, channel: Channel) -> bool {
        let removed = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&channel)
            .is_some();
        if removed {
            log::info!("Handler removed: channel={channel}");
        }
        removed
    }

    /// Deliver a payload to every listener on a channel.
    ///
    /// Listeners run in registration order, once each. The list is snapshotted
    /// first, so listeners added during delivery only see later emissions.
    ///
    /// # Returns
    /// Number of listeners invoked.
    pub fn send(&self, channel: Channel, payload: Value) -> usize {
        let snapshot: Vec<Listener> = lock(&self.listeners)
            .get(&channel)
            .cloned()
            .unwrap_or_default();

        if snapshot.is_empty() {
            log::debug!("No listeners for emission: channel={channel}");
            return 0;
        }

        for listener in &snapshot {
            listener(&payload);
        }

        log::trace!(
            "Emission delivered: channel={channel}, listeners={}",
            snapshot.len()
        );
        snapshot.len()
    }

    /// Number of dispatches seen on a channel since creation.
    pub fn invoke_count(&self, channel: Channel) -> u64 {
        lock(&self.invoke_counts).get(&channel).copied().unwrap_or(0)
    }

    /// Number of listeners currently registered on a channel.
    pub fn listener_count(&self, channel: Channel) -> usize {
        lock(&self.listeners).get(&channel).map_or(0, Vec::len)
    }

    /// Lower-trust endpoint bound to this side. Only bridges obtain one.
    pub(crate) fn renderer(self: &Arc<Self>) -> IpcRenderer {
        IpcRenderer::new(Arc::clone(self))
    }

    pub(crate) async fn dispatch(
        &self,
        channel: Channel,
        payload: Value,
    ) -> Result<Value, ApiError> {
        *lock(&self.invoke_counts).entry(channel).or_insert(0) += 1;

        // Clone out of the lock so the handler can run across awaits.
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&channel)
            .cloned();

        let Some(handler) = handler else {
            log::warn!("Dispatch on unhandled channel: channel={channel}");
            return Err(ApiError::ChannelNotHandled {
                channel: channel.as_str().to_string(),
            });
        };

        log::debug!("Dispatching: channel={channel}");
        handler.handle(payload).await
    }

    pub(crate) fn add_listener(&self, channel: Channel, listener: Listener) {
        let mut listeners = lock(&self.listeners);
        let entries = listeners.entry(channel).or_default();
        entries.push(listener);
        log::debug!(
            "Listener registered: channel={channel}, total_listeners={}",
            entries.len()
        );
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
