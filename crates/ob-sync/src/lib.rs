pub mod change_feed;
pub mod error;
pub mod metrics;
pub mod reload_scheduler;
pub mod subscription_manager;
pub mod table_map;

pub use change_feed::{
    ChangeCallback, ChangeChannel, ChangeFeed, ChangeFilter, ChangeOp, ChannelStatus, RawChange,
    StatusCallback,
};
pub use error::{Result, SyncError};
pub use metrics::Metrics;
pub use reload_scheduler::{ReloadFn, ReloadScheduler};
pub use subscription_manager::RealtimeSubscriptionManager;
pub use table_map::{TENANT_COLUMN, entity_for_table, tracked_tables};


use tracing::info_span;

/// Create a tracing span for one tenant's sync activity.
/// All log entries within the scope will include these fields.
pub fn create_sync_span(tenant_id: &str, operation: &str) -> tracing::Span {
    info_span!(
        "tenant_sync",
        tenant_id = %tenant_id,
        operation = %operation,
    )
}
