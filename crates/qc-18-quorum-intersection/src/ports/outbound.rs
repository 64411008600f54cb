//! Driven ports (Outbound dependencies)

use shared_types::NodeId;

/// Display names for diagnostics
///
/// Only consulted when rendering log output. The verdict never depends on
/// what a resolver returns.
pub trait NodeNameResolver: Send + Sync {
    /// Short human-readable name for `id`.
    fn short_name(&self, id: &NodeId) -> String;

    /// Render a list of ids as `[a, b, c]`.
    fn render(&self, ids: &[NodeId]) -> String {
        let names: Vec<String> = ids.iter().map(|id| self.short_name(id)).collect();
        format!("[{}]", names.join(", "))
    }
}
