/// Namespace prefix shared by every tenant-scoped cache key
pub const TENANT_NAMESPACE: &str = "tenant:";

/// Keys that must never be evicted, checked before any prefix logic
pub const PROTECTED_KEYS: [&str; 3] = [
    "session:current-user",
    "session:auth-token",
    "global:schema-version",
];

/// Full delimited prefix for one tenant's keys, e.g. `tenant:t1:`.
/// Matching on the trailing delimiter is what keeps tenant "12" from
/// matching keys of tenant "123".
pub fn tenant_prefix(tenant_id: &str) -> String {
    format!("{TENANT_NAMESPACE}{tenant_id}:")
}

/// Build a tenant-scoped cache key
pub fn tenant_key(tenant_id: &str, rest: &str) -> String {
    format!("{TENANT_NAMESPACE}{tenant_id}:{rest}")
}
