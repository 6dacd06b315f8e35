//! Fixed channel names shared by both sides of the bridge.

use crate::api::types::ApiError;

/// Channel name for read requests
pub const CHANNEL_READ_FILE: &str = "read-file";
/// Channel name for write requests
pub const CHANNEL_WRITE_FILE: &str = "write-file";
/// Channel name for privileged-side update notifications
pub const CHANNEL_UPDATE: &str = "update";

/// A dispatch channel between the privileged side and the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    ReadFile,
    WriteFile,
    Update,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::ReadFile, Channel::WriteFile, Channel::Update];

    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadFile => CHANNEL_READ_FILE,
            Self::WriteFile => CHANNEL_WRITE_FILE,
            Self::Update => CHANNEL_UPDATE,
        }
    }

    /// Whether the channel carries request/response traffic (as opposed to emissions).
    pub fn is_invokable(self) -> bool {
        !matches!(self, Self::Update)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a channel from its wire name. Names are matched exactly after trimming.
pub fn parse_channel(value: &str) -> Result<Channel, ApiError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ApiError::InvalidInput {
            message: "Channel name cannot be empty".to_string(),
        });
    }

    match normalized {
        CHANNEL_READ_FILE => Ok(Channel::ReadFile),
        CHANNEL_WRITE_FILE => Ok(Channel::WriteFile),
        CHANNEL_UPDATE => Ok(Channel::Update),
        other => Err(ApiError::ChannelNotHandled {
            channel: other.to_string(),
        }),
    }
}
