use num_traits::{Float, Zero};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::driver::{DriverPort, Report};
use crate::graph::{Edge, NodeId};

/// A driver that appends every report to an internal log
///
/// The integration tests are built on it, and it doubles as a headless driver
/// for callers that want to run a search to completion and examine the full
/// event sequence afterwards.
#[derive(Debug)]
pub struct RecordingDriver<W>
where
    W: Float + Zero + Debug + Copy,
{
    reports: RefCell<Vec<Report<W>>>,
}

impl<W> RecordingDriver<W>
where
    W: Float + Zero + Debug + Copy,
{
    pub fn new() -> Self {
        RecordingDriver {
            reports: RefCell::new(Vec::new()),
        }
    }

    /// A copy of everything reported so far, in order
    pub fn reports(&self) -> Vec<Report<W>> {
        self.reports.borrow().clone()
    }

    /// Drains the log, leaving it empty
    pub fn take_reports(&self) -> Vec<Report<W>> {
        self.reports.take()
    }

    /// The nodes settled so far, in settlement order
    pub fn settled_nodes(&self) -> Vec<NodeId> {
        self.reports
            .borrow()
            .iter()
            .filter_map(|report| match report {
                Report::NodeSettled { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }
}

impl<W> Default for RecordingDriver<W>
where
    W: Float + Zero + Debug + Copy,
{
    fn default() -> Self {
        RecordingDriver::new()
    }
}

impl<W> DriverPort<W> for RecordingDriver<W>
where
    W: Float + Zero + Debug + Copy,
{
    fn report_node_settled(&self, node: NodeId, distance: W) {
        self.reports
            .borrow_mut()
            .push(Report::NodeSettled { node, distance });
    }

    fn report_edge_relaxed(&self, edge: &Edge<W>, neighbor: NodeId, new_distance: W) {
        self.reports.borrow_mut().push(Report::EdgeRelaxed {
            edge: edge.clone(),
            neighbor,
            new_distance,
        });
    }

    fn report_node_finished(&self, node: NodeId) {
        self.reports.borrow_mut().push(Report::NodeFinished { node });
    }

    fn report_completed(
        &self,
        distances: &HashMap<NodeId, W>,
        predecessors: &HashMap<NodeId, NodeId>,
        reached_end: bool,
    ) {
        self.reports.borrow_mut().push(Report::Completed {
            distances: distances.clone(),
            predecessors: predecessors.clone(),
            reached_end,
        });
    }
}

/// A driver that ignores every report
#[derive(Debug, Default)]
pub struct NullDriver;

impl<W> DriverPort<W> for NullDriver
where
    W: Float + Zero + Debug + Copy,
{
    fn report_node_settled(&self, _node: NodeId, _distance: W) {}

    fn report_edge_relaxed(&self, _edge: &Edge<W>, _neighbor: NodeId, _new_distance: W) {}

    fn report_node_finished(&self, _node: NodeId) {}

    fn report_completed(
        &self,
        _distances: &HashMap<NodeId, W>,
        _predecessors: &HashMap<NodeId, NodeId>,
        _reached_end: bool,
    ) {
    }
}
