use crate::Result;

use std::sync::Arc;

use async_trait::async_trait;

/// Callback receiving raw change notifications from an open channel
pub type ChangeCallback = Arc<dyn Fn(RawChange) + Send + Sync>;

/// Callback receiving channel status transitions
pub type StatusCallback = Arc<dyn Fn(ChannelStatus) + Send + Sync>;

/// Server-side filter for one change listener: a table plus an equality
/// constraint on its tenant column.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    pub table: String,
    pub tenant_column: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// Raw table-level change notification as delivered by the backing store
#[derive(Debug, Clone)]
pub struct RawChange {
    pub table: String,
    pub op: ChangeOp,
    /// Tenant column value of the changed row, when the store provides it
    pub tenant_id: Option<String>,
}

/// Status reported by an established channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Subscribed,
    TimedOut,
    Errored,
    Closed,
}

impl ChannelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribed => "subscribed",
            Self::TimedOut => "timed_out",
            Self::Errored => "errored",
            Self::Closed => "closed",
        }
    }
}

/// Change-feed boundary of the backing store
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Open a named logical channel against the store's change feed
    async fn open_channel(&self, name: &str) -> Result<Box<dyn ChangeChannel>>;
}

/// One open realtime channel.
///
/// Listener registration happens before `subscribe`; after `close` the
/// channel delivers nothing.
pub trait ChangeChannel: Send + Sync {
    /// Register a filtered change listener
    fn on_change(&mut self, filter: ChangeFilter, callback: ChangeCallback);

    /// Activate the channel and start receiving status transitions
    fn subscribe(&mut self, status: StatusCallback) -> Result<()>;

    /// Close the underlying transport
    fn close(&mut self);
}
