use crate::models::entity_kind::EntityKind;
use crate::models::invalidation_reason::InvalidationReason;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signal that a tenant's cached view of one entity kind is stale and should
/// be refetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvalidationEvent {
    /// Tenant the event belongs to. `None` is treated by consumers as
    /// "applies to whatever tenant is currently active".
    pub tenant_id: Option<String>,
    pub entity: EntityKind,
    pub reason: InvalidationReason,
    pub at: DateTime<Utc>,
    /// Diagnostic provenance, e.g. the raw table that produced the change
    pub source: String,
}

impl InvalidationEvent {
    /// Event produced by the realtime change feed
    pub fn realtime(
        tenant_id: impl Into<String>,
        entity: EntityKind,
        source: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
            entity,
            reason: InvalidationReason::Realtime,
            at: Utc::now(),
            source: source.into(),
        }
    }

    /// Event requested explicitly by a caller, e.g. after a local mutation
    pub fn manual(tenant_id: impl Into<String>, entity: EntityKind) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
            entity,
            reason: InvalidationReason::Manual,
            at: Utc::now(),
            source: "manual".to_string(),
        }
    }

    /// Tenant-less event produced by a system-wide operation; consumers treat
    /// it as applying to their own active tenant.
    pub fn system(entity: EntityKind) -> Self {
        Self {
            tenant_id: None,
            entity,
            reason: InvalidationReason::System,
            at: Utc::now(),
            source: "system".to_string(),
        }
    }

    /// Whether this event applies to the given tenant. Events without a
    /// tenant id apply to every tenant.
    pub fn applies_to_tenant(&self, tenant_id: &str) -> bool {
        match &self.tenant_id {
            Some(t) => t == tenant_id,
            None => true,
        }
    }
}
