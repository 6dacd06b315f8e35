//! Messaging primitive between the privileged side and the bridge.
//!
//! This module provides:
//! - `channel`: the fixed channel names both sides agree on
//! - `IpcMain`: handler registry and emitter on the privileged side
//! - `IpcRenderer`: crate-internal endpoint owned by bridges

pub mod channel;
pub mod main_process;
pub(crate) mod renderer;

pub use channel::Channel;
pub use main_process::{handler_fn, InvokeHandler, IpcMain};
