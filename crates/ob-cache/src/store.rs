use crate::Result;

/// Key/value storage backend (durable or ephemeral variant).
///
/// Every operation can fail independently; callers scanning many keys are
/// expected to tolerate per-key faults and keep going.
pub trait KeyValueStore: Send + Sync {
    /// Short name for logs, e.g. "durable" or "ephemeral"
    fn name(&self) -> &str;

    /// Enumerate all keys currently present
    fn keys(&self) -> Result<Vec<String>>;

    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
