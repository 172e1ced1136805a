//! Mapping between problem nodes and routing indices.
//!
//! Routing index 0 is the route start at the depot, every non-depot node
//! takes the next index in ascending node order, and the final index is the
//! route end, again at the depot. The depot therefore owns two indices while
//! every other node owns exactly one.

/// Bidirectional node/index mapping for a single vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexManager {
    index_to_node: Vec<usize>,
    node_to_index: Vec<Option<usize>>,
}

impl IndexManager {
    /// Build the mapping for `node_count` nodes with the given depot.
    #[must_use]
    pub fn new(node_count: usize, depot: usize) -> Self {
        let mut index_to_node = Vec::with_capacity(node_count.saturating_add(1));
        index_to_node.push(depot);
        index_to_node.extend((0..node_count).filter(|&node| node != depot));
        index_to_node.push(depot);

        let mut node_to_index = vec![None; node_count];
        for (index, &node) in index_to_node.iter().enumerate() {
            if let Some(slot) = node_to_index.get_mut(node)
                && slot.is_none()
            {
                *slot = Some(index);
            }
        }

        Self {
            index_to_node,
            node_to_index,
        }
    }

    /// Routing index where the route starts.
    #[must_use]
    pub const fn start_index(&self) -> usize {
        0
    }

    /// Routing index where the route ends.
    #[must_use]
    pub const fn end_index(&self) -> usize {
        self.index_to_node.len().saturating_sub(1)
    }

    /// Number of routing indices, start and end included.
    #[must_use]
    pub const fn index_count(&self) -> usize {
        self.index_to_node.len()
    }

    /// Node visited at `index`.
    #[must_use]
    pub fn node_of(&self, index: usize) -> Option<usize> {
        self.index_to_node.get(index).copied()
    }

    /// Routing index of `node`; the depot maps to the start index.
    #[must_use]
    pub fn index_of(&self, node: usize) -> Option<usize> {
        self.node_to_index.get(node).copied().flatten()
    }

    /// Whether `index` is the route start or end.
    #[must_use]
    pub const fn is_depot_index(&self, index: usize) -> bool {
        index == self.start_index() || index == self.end_index()
    }
}
