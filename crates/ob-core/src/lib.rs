pub mod bus;
pub mod error;
pub mod listener_id;
pub mod models;
pub mod session;
pub mod signal;

pub use bus::{BusListener, InvalidationBus};
pub use error::{CoreError, Result};
pub use listener_id::ListenerId;
pub use models::entity_kind::EntityKind;
pub use models::invalidation_event::InvalidationEvent;
pub use models::invalidation_reason::InvalidationReason;
pub use session::{TenantListener, TenantSession};
pub use signal::TenantSwitchSignal;

#[cfg(test)]
mod tests;
