//! API types for the privileged/lower-trust bridge.
//!
//! This module defines stable types for Tauri commands, bridge channels and
//! events, isolating file-system details from callers.

pub mod types;
