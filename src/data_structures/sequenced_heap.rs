use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;

use crate::graph::NodeId;

/// A min-heap of `(priority, sequence, node)` entries for the step engine
///
/// Every push is tagged with a strictly increasing sequence number, so entries
/// with equal priority pop in insertion order. The sequence number exists only
/// for this tie-break: it makes entries totally ordered and step sequences
/// reproducible, and it never leaves this module.
///
/// The heap is append-only between pops. Relaxing a node that is already
/// queued pushes a second entry instead of updating the first; the engine
/// discards the stale one when it surfaces.
#[derive(Debug, Clone)]
pub struct SequencedHeap<W>
where
    W: PartialOrd + Copy + Debug + Ord,
{
    heap: BinaryHeap<Reverse<(W, u64, NodeId)>>,
    next_seq: u64,
}

impl<W> SequencedHeap<W>
where
    W: PartialOrd + Copy + Debug + Ord,
{
    /// Creates a new empty heap with the sequence counter at zero
    pub fn new() -> Self {
        SequencedHeap {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of entries, stale ones included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Pushes a node with the given priority, tagging it with the next
    /// sequence number
    pub fn push(&mut self, node: NodeId, priority: W) {
        self.next_seq += 1;
        self.heap.push(Reverse((priority, self.next_seq, node)));
    }

    /// Removes and returns the entry with the lowest `(priority, sequence)`
    pub fn pop(&mut self) -> Option<(NodeId, W)> {
        self.heap
            .pop()
            .map(|Reverse((priority, _, node))| (node, priority))
    }

    /// Returns the lowest entry without removing it
    pub fn peek(&self) -> Option<(NodeId, W)> {
        self.heap
            .peek()
            .map(|&Reverse((priority, _, node))| (node, priority))
    }

    /// Drops all entries; the sequence counter keeps counting
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// The pending entries in pop order, without their sequence numbers
    ///
    /// Used for history snapshots, which expose queue contents but not the
    /// internal tie-break counter.
    pub fn sorted_pending(&self) -> Vec<(NodeId, W)> {
        self.heap
            .clone()
            .into_sorted_vec()
            .into_iter()
            .rev()
            .map(|Reverse((priority, _, node))| (node, priority))
            .collect()
    }
}

impl<W> Default for SequencedHeap<W>
where
    W: PartialOrd + Copy + Debug + Ord,
{
    fn default() -> Self {
        SequencedHeap::new()
    }
}
