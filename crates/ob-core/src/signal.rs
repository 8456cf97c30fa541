/// Cross-tab/process broadcast of a tenant switch.
///
/// The session invokes `broadcast` after every distinct tenant transition so
/// sibling processes can observe the switch. The core never depends on
/// receiving such a signal itself.
pub trait TenantSwitchSignal: Send + Sync {
    fn broadcast(&self, tenant_id: Option<&str>);
}
