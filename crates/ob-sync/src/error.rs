use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Channel {channel} could not be opened: {message} {location}")]
    ChannelOpen {
        channel: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Subscribe on channel {channel} failed: {message} {location}")]
    Subscribe {
        channel: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Channel {channel} is closed {location}")]
    ChannelClosed {
        channel: String,
        location: ErrorLocation,
    },
}

impl SyncError {
    /// Create a channel-open error
    #[track_caller]
    pub fn channel_open(channel: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::ChannelOpen {
            channel: channel.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a subscribe error
    #[track_caller]
    pub fn subscribe(channel: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::Subscribe {
            channel: channel.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a closed-channel error
    #[track_caller]
    pub fn channel_closed(channel: impl Into<String>) -> Self {
        SyncError::ChannelClosed {
            channel: channel.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
