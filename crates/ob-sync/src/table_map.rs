use ob_core::EntityKind;

/// Tenant discriminator column present on every tracked table
pub const TENANT_COLUMN: &str = "tenant_id";

/// Static mapping from raw table names to the coarse entity kinds used for
/// invalidation. Tables not listed here are untracked; changes from them are
/// dropped.
const TABLE_ENTITY_MAP: [(&str, EntityKind); 6] = [
    ("maintenances", EntityKind::Maintenances),
    ("maintenance_schedules", EntityKind::Maintenances),
    ("providers", EntityKind::Providers),
    ("provider_contacts", EntityKind::Providers),
    ("vehicles", EntityKind::Vehicles),
    ("vehicle_categories", EntityKind::Categories),
];

/// Map a raw table name to its entity kind
pub fn entity_for_table(table: &str) -> Option<EntityKind> {
    TABLE_ENTITY_MAP
        .iter()
        .find(|(name, _)| *name == table)
        .map(|(_, entity)| *entity)
}

/// All tracked tables with their entity kinds
pub fn tracked_tables() -> impl Iterator<Item = (&'static str, EntityKind)> {
    TABLE_ENTITY_MAP.iter().copied()
}
