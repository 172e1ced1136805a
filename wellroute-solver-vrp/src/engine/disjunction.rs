//! Per-node disjunctions: which nodes may be skipped, and at what price.

use wellroute_core::ProblemModel;

/// Whether a node must be visited or may be dropped for a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The node is always on the route (the depot).
    Mandatory,
    /// The node may be left out, adding `penalty` to the objective.
    Optional {
        /// Cost charged when the node is not visited.
        penalty: u64,
    },
}

impl NodeKind {
    /// Penalty charged for dropping the node, if it can be dropped.
    #[must_use]
    pub const fn drop_penalty(self) -> Option<u64> {
        match self {
            Self::Mandatory => None,
            Self::Optional { penalty } => Some(penalty),
        }
    }
}

/// The disjunction of every node in a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disjunctions {
    kinds: Vec<NodeKind>,
}

impl Disjunctions {
    /// The depot is mandatory; every other node is optional with penalty
    /// `drop_penalty_factor * value_weight`, saturating at `u64::MAX`.
    #[must_use]
    pub fn new(model: &ProblemModel, drop_penalty_factor: u64) -> Self {
        let kinds = model
            .value_weights()
            .iter()
            .enumerate()
            .map(|(node, &weight)| {
                if node == model.depot() {
                    NodeKind::Mandatory
                } else {
                    NodeKind::Optional {
                        penalty: weight.saturating_mul(drop_penalty_factor),
                    }
                }
            })
            .collect();
        Self { kinds }
    }

    /// Disjunction for `node`; unknown nodes are treated as mandatory.
    #[must_use]
    pub fn kind(&self, node: usize) -> NodeKind {
        self.kinds.get(node).copied().unwrap_or(NodeKind::Mandatory)
    }

    /// Penalty for dropping `node`, zero for mandatory nodes.
    #[must_use]
    pub fn penalty(&self, node: usize) -> u64 {
        self.kind(node).drop_penalty().unwrap_or(0)
    }

    /// Sum of penalties over `nodes`.
    pub fn total_penalty<I>(&self, nodes: I) -> u128
    where
        I: IntoIterator<Item = usize>,
    {
        nodes
            .into_iter()
            .map(|node| u128::from(self.penalty(node)))
            .sum()
    }
}
