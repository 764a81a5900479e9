use num_traits::{Float, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::graph::{Edge, NodeId};

/// The contract the step engine reports progress through
///
/// Implemented by the rendering collaborator (or a test double). The engine
/// calls exactly one of these per suspension point, after its own bookkeeping
/// for the step is done and with no internal borrows held, so a callback may
/// freely query the engine. Callbacks must not call `advance()` or `run()` on
/// the engine that invoked them; the engine rejects that with a re-entrancy
/// error.
///
/// Receivers are `&self`: drivers that accumulate state use interior
/// mutability, like [`crate::RecordingDriver`].
pub trait DriverPort<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// A node was popped as the closest unvisited node and marked visited
    fn report_node_settled(&self, node: NodeId, distance: W);

    /// An edge produced a strictly better distance for `neighbor`
    fn report_edge_relaxed(&self, edge: &Edge<W>, neighbor: NodeId, new_distance: W);

    /// All outgoing edges of `node` have been examined
    fn report_node_finished(&self, node: NodeId);

    /// The search is over
    ///
    /// Nodes absent from `distances` were never reached (distance +infinity).
    /// `reached_end` is true when the run ended by settling the end node.
    fn report_completed(
        &self,
        distances: &HashMap<NodeId, W>,
        predecessors: &HashMap<NodeId, NodeId>,
        reached_end: bool,
    );
}

/// An owned record of one engine report
///
/// Mirrors the [`DriverPort`] callbacks one-to-one so drivers can log, replay,
/// or ship progress events to another process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Report<W>
where
    W: Float + Zero + Debug + Copy,
{
    NodeSettled {
        node: NodeId,
        distance: W,
    },
    EdgeRelaxed {
        edge: Edge<W>,
        neighbor: NodeId,
        new_distance: W,
    },
    NodeFinished {
        node: NodeId,
    },
    Completed {
        distances: HashMap<NodeId, W>,
        predecessors: HashMap<NodeId, NodeId>,
        reached_end: bool,
    },
}
