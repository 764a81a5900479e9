//! Step SSSP - Stepwise Single-Source Shortest Path Engine
//!
//! This library runs Dijkstra's algorithm one discrete step at a time. Instead of
//! computing shortest paths to completion, the engine suspends after every
//! observable event (a node settled, an edge relaxed, a node finished) and
//! returns control to an external driver, which decides when to resume -
//! immediately, after a user click, or after an animation completes.
//!
//! The engine reports progress through the [`DriverPort`] trait and keeps an
//! append-only history of pre-visit snapshots so past steps can be inspected or
//! re-rendered without re-running the search.

pub mod data_structures;
pub mod driver;
pub mod engine;
pub mod graph;

pub use driver::{DriverPort, NullDriver, RecordingDriver, Report};
pub use engine::{EngineState, Snapshot, StepEngine, StepOutcome};
/// Re-export main types for convenient use
pub use graph::{Edge, Graph, Node, NodeId, NodeRole, Point};

/// Error types for the library
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Node not in graph: {0}")]
    UnknownNode(NodeId),

    #[error("advance() called from inside a driver callback")]
    Reentrancy,

    #[error("Invalid engine state: {0}")]
    InvalidState(&'static str),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
