use log::{debug, trace};
use num_traits::{Float, Zero};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use crate::data_structures::SequencedHeap;
use crate::driver::DriverPort;
use crate::engine::Snapshot;
use crate::graph::{Edge, Graph, NodeId};
use crate::{Error, Result};

/// Lifecycle state of a [`StepEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// What a call to [`StepEngine::advance`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The engine ran to the next suspension point and stopped there
    Stepped,
    /// The search finished during this call
    Completed,
    /// The engine was already in a terminal state; nothing happened
    AlreadyFinished,
}

/// Where a suspended search resumes on the next `advance()`
///
/// This replaces a coroutine-style yield: the saved phase plus the current
/// edge index is all the resume state the step loop needs.
#[derive(Debug, Clone, Copy)]
enum Phase {
    /// About to pop the next unvisited node off the queue
    PopNext,
    /// `node` was just settled; end check and edge scan still pending
    Settled { node: NodeId },
    /// Scanning outgoing edges of `node`, next up is index `next_edge`
    Relaxing { node: NodeId, next_edge: usize },
}

/// Mutable state of one search run
#[derive(Debug)]
struct SearchState<W>
where
    W: Float + Zero + Debug + Copy + Ord,
{
    queue: SequencedHeap<W>,
    /// Best known distance per node; absent means +infinity
    distances: HashMap<NodeId, W>,
    predecessors: HashMap<NodeId, NodeId>,
    visited: HashSet<NodeId>,
    /// Pre-visit snapshots, one per settled node, in chronological order
    history: Vec<Snapshot<W>>,
    phase: Phase,
    end: NodeId,
}

/// The engine's next observable event, computed with all bookkeeping for it
/// already applied
#[derive(Debug)]
enum StepEvent<W>
where
    W: Float + Zero + Debug + Copy + Ord,
{
    Settled {
        node: NodeId,
        distance: W,
    },
    Relaxed {
        edge: Edge<W>,
        neighbor: NodeId,
        distance: W,
    },
    Finished {
        node: NodeId,
    },
    /// The queue ran dry without settling the end node
    Drained,
    /// The settled node was the end node
    ReachedEnd,
}

impl<W> SearchState<W>
where
    W: Float + Zero + Debug + Copy + Ord,
{
    fn new(end: NodeId) -> Self {
        SearchState {
            queue: SequencedHeap::new(),
            distances: HashMap::new(),
            predecessors: HashMap::new(),
            visited: HashSet::new(),
            history: Vec::new(),
            phase: Phase::PopNext,
            end,
        }
    }

    fn distance_of(&self, node: NodeId) -> W {
        self.distances
            .get(&node)
            .copied()
            .unwrap_or_else(W::infinity)
    }

    /// Snapshot of the state right after popping `current`, before marking it
    /// visited
    fn capture(&self, current: NodeId) -> Snapshot<W> {
        Snapshot {
            pending: self.queue.sorted_pending(),
            visited: self.visited.clone(),
            distances: self.distances.clone(),
            predecessors: self.predecessors.clone(),
            current,
        }
    }

    /// Runs from the saved phase to the next suspension point or completion
    fn next_event(&mut self, graph: &Graph<W>) -> StepEvent<W> {
        loop {
            match self.phase {
                Phase::PopNext => loop {
                    match self.queue.pop() {
                        None => return StepEvent::Drained,
                        Some((node, _priority)) => {
                            // Lazy deletion: relaxations leave old entries in
                            // the queue, and they surface here after the node
                            // was settled through a better one.
                            if self.visited.contains(&node) {
                                trace!("discarding stale queue entry for {}", node);
                                continue;
                            }
                            let snapshot = self.capture(node);
                            self.history.push(snapshot);
                            self.visited.insert(node);
                            self.phase = Phase::Settled { node };
                            return StepEvent::Settled {
                                node,
                                distance: self.distance_of(node),
                            };
                        }
                    }
                },
                Phase::Settled { node } => {
                    if node == self.end {
                        return StepEvent::ReachedEnd;
                    }
                    self.phase = Phase::Relaxing { node, next_edge: 0 };
                }
                Phase::Relaxing { node, next_edge } => {
                    let edges = graph.outgoing(node);
                    let base = self.distance_of(node);
                    for idx in next_edge..edges.len() {
                        let edge = &edges[idx];
                        let candidate = base + edge.weight;
                        // Strict improvement only: an equal-cost route neither
                        // relaxes nor re-queues the neighbor.
                        if candidate < self.distance_of(edge.target) {
                            self.distances.insert(edge.target, candidate);
                            self.predecessors.insert(edge.target, node);
                            self.queue.push(edge.target, candidate);
                            self.phase = Phase::Relaxing {
                                node,
                                next_edge: idx + 1,
                            };
                            return StepEvent::Relaxed {
                                edge: edge.clone(),
                                neighbor: edge.target,
                                distance: candidate,
                            };
                        }
                    }
                    self.phase = Phase::PopNext;
                    return StepEvent::Finished { node };
                }
            }
        }
    }
}

/// Dijkstra's algorithm as a resumable state machine
///
/// Each [`run`](StepEngine::run) / [`advance`](StepEngine::advance) call moves
/// the search forward to exactly one suspension point (a node settled, an edge
/// relaxed, or a node finished) and reports it through the given
/// [`DriverPort`] before returning. The driver is free to call `advance()`
/// again immediately or arbitrarily later; the engine does no background work
/// in between.
///
/// The engine holds a shared borrow of the graph for its whole lifetime, so
/// an editing collaborator cannot mutate the graph while an engine exists -
/// the mutual exclusion the search needs is enforced by the borrow checker.
///
/// Non-negative edge weights are a caller precondition. Negative weights are
/// not rejected; they make the resulting distances unspecified.
#[derive(Debug)]
pub struct StepEngine<'g, W>
where
    W: Float + Zero + Debug + Copy + Ord,
{
    graph: &'g Graph<W>,
    state: Cell<EngineState>,
    search: RefCell<Option<SearchState<W>>>,
    /// Set while a driver callback is on the stack; re-entrant calls check it
    dispatching: Cell<bool>,
}

impl<'g, W> StepEngine<'g, W>
where
    W: Float + Zero + Debug + Copy + Ord,
{
    /// Creates an idle engine over the given graph
    pub fn new(graph: &'g Graph<W>) -> Self {
        StepEngine {
            graph,
            state: Cell::new(EngineState::Idle),
            search: RefCell::new(None),
            dispatching: Cell::new(false),
        }
    }

    /// Starts a search and synchronously performs its first step, leaving the
    /// engine suspended at the first `NodeSettled` report
    ///
    /// `start == end` is valid (a trivial zero-length search). Fails with
    /// [`Error::UnknownNode`] if either node is not in the graph and with
    /// [`Error::InvalidState`] while another search is active; a rejected call
    /// mutates nothing. Calling `run` again after `Completed` or `Aborted`
    /// starts a fresh search.
    pub fn run(&self, driver: &dyn DriverPort<W>, start: NodeId, end: NodeId) -> Result<()> {
        if self.dispatching.get() {
            return Err(Error::Reentrancy);
        }
        if self.state.get() == EngineState::Running {
            return Err(Error::InvalidState("run() while a search is active"));
        }
        if !self.graph.contains(start) {
            return Err(Error::UnknownNode(start));
        }
        if !self.graph.contains(end) {
            return Err(Error::UnknownNode(end));
        }

        debug!("starting search from {} to {}", start, end);
        let mut search = SearchState::new(end);
        search.distances.insert(start, W::zero());
        search.queue.push(start, W::zero());
        *self.search.borrow_mut() = Some(search);
        self.state.set(EngineState::Running);

        self.step(driver)?;
        Ok(())
    }

    /// Resumes the suspended search and runs it to the next suspension point
    /// or to completion
    ///
    /// Returns [`StepOutcome::AlreadyFinished`] without reporting anything
    /// when the engine is in a terminal state. Fails with
    /// [`Error::InvalidState`] before `run()` and with [`Error::Reentrancy`]
    /// when called from inside a driver callback.
    pub fn advance(&self, driver: &dyn DriverPort<W>) -> Result<StepOutcome> {
        if self.dispatching.get() {
            return Err(Error::Reentrancy);
        }
        match self.state.get() {
            EngineState::Completed | EngineState::Aborted => Ok(StepOutcome::AlreadyFinished),
            EngineState::Idle => Err(Error::InvalidState("advance() before run()")),
            EngineState::Running => self.step(driver),
        }
    }

    /// Cancels the search immediately
    ///
    /// Discards the queue and the snapshot history and issues no further
    /// reports. A no-op in terminal states.
    pub fn abort(&self) {
        match self.state.get() {
            EngineState::Completed | EngineState::Aborted => {}
            _ => {
                debug!("search aborted");
                self.state.set(EngineState::Aborted);
                *self.search.borrow_mut() = None;
            }
        }
    }

    pub fn current_state(&self) -> EngineState {
        self.state.get()
    }

    /// Number of snapshots recorded so far (one per settled node)
    pub fn history_len(&self) -> usize {
        self.search.borrow().as_ref().map_or(0, |s| s.history.len())
    }

    /// A copy of the snapshot at `index`, oldest first
    ///
    /// The history is append-only; past snapshots never change, so rewinding
    /// a visualization to one of them is purely a driver-side affair.
    pub fn history_snapshot(&self, index: usize) -> Option<Snapshot<W>> {
        self.search
            .borrow()
            .as_ref()
            .and_then(|s| s.history.get(index).cloned())
    }

    /// Best known distance to `node`, or `None` while it is unreached
    ///
    /// Tentative while the search is running; final once it has completed.
    pub fn distance_to(&self, node: NodeId) -> Option<W> {
        self.search
            .borrow()
            .as_ref()
            .and_then(|s| s.distances.get(&node).copied())
    }

    /// The shortest path from the start node to `target`, start first
    ///
    /// Only available once the search has completed; `None` before that or
    /// when `target` was never reached.
    pub fn shortest_path(&self, target: NodeId) -> Option<Vec<NodeId>> {
        if self.state.get() != EngineState::Completed {
            return None;
        }
        let guard = self.search.borrow();
        let search = guard.as_ref()?;
        if !search.distances.contains_key(&target) {
            return None;
        }

        // Walk predecessors back to the start, the one reached node without
        // a predecessor. The cycle guard protects against a corrupted map.
        let mut path = vec![target];
        let mut seen = HashSet::from([target]);
        let mut current = target;
        while let Some(&prev) = search.predecessors.get(&current) {
            if !seen.insert(prev) {
                return None;
            }
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }

    /// Runs one step and reports its event. No internal borrow is held while
    /// the driver callback executes, so callbacks may query the engine.
    fn step(&self, driver: &dyn DriverPort<W>) -> Result<StepOutcome> {
        let event = {
            let mut guard = self.search.borrow_mut();
            let search = guard
                .as_mut()
                .ok_or(Error::InvalidState("running with no active search"))?;
            search.next_event(self.graph)
        };

        match event {
            StepEvent::Settled { node, distance } => {
                trace!("settled {} at distance {:?}", node, distance);
                self.dispatch(|| driver.report_node_settled(node, distance));
                Ok(StepOutcome::Stepped)
            }
            StepEvent::Relaxed {
                edge,
                neighbor,
                distance,
            } => {
                self.dispatch(|| driver.report_edge_relaxed(&edge, neighbor, distance));
                Ok(StepOutcome::Stepped)
            }
            StepEvent::Finished { node } => {
                self.dispatch(|| driver.report_node_finished(node));
                Ok(StepOutcome::Stepped)
            }
            StepEvent::Drained => self.complete(driver, false),
            StepEvent::ReachedEnd => self.complete(driver, true),
        }
    }

    fn complete(&self, driver: &dyn DriverPort<W>, reached_end: bool) -> Result<StepOutcome> {
        self.state.set(EngineState::Completed);
        let (distances, predecessors) = {
            let guard = self.search.borrow();
            let search = guard
                .as_ref()
                .ok_or(Error::InvalidState("completed with no active search"))?;
            (search.distances.clone(), search.predecessors.clone())
        };
        debug!(
            "search completed, reached_end={}, {} nodes reached",
            reached_end,
            distances.len()
        );
        self.dispatch(|| driver.report_completed(&distances, &predecessors, reached_end));
        Ok(StepOutcome::Completed)
    }

    fn dispatch(&self, callback: impl FnOnce()) {
        self.dispatching.set(true);
        callback();
        self.dispatching.set(false);
    }
}
