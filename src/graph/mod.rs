pub mod model;

pub use model::{Edge, Graph, Node, NodeId, NodeRole, Point};
