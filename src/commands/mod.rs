//! Tauri command handlers and event forwarding for the webview.
//!
//! Import specific commands via their submodule (e.g., `commands::files::read_file`).

pub mod files;
pub mod updates;
