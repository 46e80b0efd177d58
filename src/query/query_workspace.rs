use crate::partitioning::BvNodeId;

/// Temporary data of the collision queries.
///
/// This is all temporary data that can be freed at any time without affecting results.
/// The main reason to reuse the same instance of this over time is to lower costs of internal
/// allocations.
#[derive(Clone, Debug, Default)]
pub struct QueryWorkspace {
    pub(super) pair_stack: Vec<(BvNodeId, BvNodeId)>,
    pub(super) node_stack: Vec<BvNodeId>,
    pub(super) tested_pairs: usize,
}

impl QueryWorkspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of overlap tests performed by the last query run with this workspace.
    ///
    /// For single-object queries, this counts (node, object) pairs.
    pub fn tested_pairs(&self) -> usize {
        self.tested_pairs
    }

    pub(super) fn clear(&mut self) {
        self.pair_stack.clear();
        self.node_stack.clear();
        self.tested_pairs = 0;
    }
}
