use num_traits::{Float, Zero};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use crate::graph::NodeId;

/// An immutable copy of the search state, taken right before a node is marked
/// visited
///
/// The engine pushes one snapshot per settled node onto an append-only history
/// stack. Each snapshot is a deep, independent copy: later engine mutations
/// never touch it, so drivers can rewind the visualization to any past step
/// without re-running the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Queue entries still pending after `current` was popped, in pop order.
    /// A node may appear more than once; the later entries are stale.
    pub pending: Vec<(NodeId, W)>,

    /// Nodes visited before this step; `current` is not yet among them
    pub visited: HashSet<NodeId>,

    /// Best known distances at this point; unreached nodes are absent
    pub distances: HashMap<NodeId, W>,

    /// Predecessor links established so far
    pub predecessors: HashMap<NodeId, NodeId>,

    /// The node about to be settled
    pub current: NodeId,
}
