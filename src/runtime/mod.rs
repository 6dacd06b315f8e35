//! Runtime modules for the privileged side of the bridge.
//!
//! The runtime domain owns everything the lower-trust side may not touch
//! directly: path scoping, file access and update emission.

pub mod fs;
pub mod host;
pub mod path;
