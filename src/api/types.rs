//! Bridge types for commands and events.
//!
//! These types are shared by the privileged host, the in-process bridge and
//! the webview bindings, so their serialized shape is part of the contract.

use serde::{Deserialize, Serialize};
use specta::Type;

/// Arguments carried on the `read-file` channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileArgs {
    /// Path identifier, forwarded exactly as the caller gave it
    pub path: String,
}

/// Arguments carried on the `write-file` channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct WriteFileArgs {
    /// Path identifier, forwarded exactly as the caller gave it
    pub path: String,
    /// Full text content to store
    pub content: String,
}

/// What happened to the file named in a [`FileUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub enum UpdateKind {
    /// Content was replaced through the write capability
    Written,
    /// Privileged side reports an out-of-band change
    Changed,
}

/// Payload emitted on the `update` channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct FileUpdate {
    pub kind: UpdateKind,
    /// Path as the requester named it
    pub path: String,
    /// Bytes written, zero for `Changed`
    pub bytes_written: f64,
    /// Timestamp of the change (milliseconds since epoch)
    /// Using f64 for JavaScript number compatibility
    pub at_ms: f64,
}

/// API errors for frontend consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
#[serde(tag = "type")]
pub enum ApiError {
    /// Invalid input parameter
    InvalidInput { message: String },
    /// Path does not exist or is not accessible
    PathNotFound { path: String },
    /// Path is not a directory
    PathNotDirectory { path: String },
    /// IO error during file system operation
    IoError { message: String },
    /// Nothing on the privileged side answers this channel
    ChannelNotHandled { channel: String },
    /// A channel accepts a single invoke handler
    HandlerAlreadyRegistered { channel: String },
    /// Payload did not match the shape expected on a channel
    PayloadDecode { channel: String, message: String },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidInput { message } => write!(f, "Invalid input: {message}"),
            ApiError::PathNotFound { path } => write!(f, "Path not found: {path}"),
            ApiError::PathNotDirectory { path } => write!(f, "Path is not a directory: {path}"),
            ApiError::IoError { message } => write!(f, "IO error: {message}"),
            ApiError::ChannelNotHandled { channel } => {
                write!(f, "No handler registered for channel: {channel}")
            }
            ApiError::HandlerAlreadyRegistered { channel } => {
                write!(f, "Handler already registered for channel: {channel}")
            }
            ApiError::PayloadDecode { channel, message } => {
                write!(f, "Malformed payload on channel {channel}: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_serializes_with_type_tag() {
        let err = ApiError::ChannelNotHandled {
            channel: "read-file".to_string(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({ "type": "ChannelNotHandled", "channel": "read-file" })
        );
    }

    #[test]
    fn test_file_update_uses_camel_case() {
        let update = FileUpdate {
            kind: UpdateKind::Written,
            path: "notes.txt".to_string(),
            bytes_written: 5.0,
            at_ms: 1.0,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["kind"], "written");
        assert_eq!(value["bytesWritten"], 5.0);
        assert_eq!(value["atMs"], 1.0);
    }

    #[test]
    fn test_display_includes_path() {
        let err = ApiError::PathNotFound {
            path: "/tmp/missing.txt".to_string(),
        };
        assert_eq!(err.to_string(), "Path not found: /tmp/missing.txt");
    }
}
