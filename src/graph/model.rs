use num_traits::{Float, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;

use crate::{Error, Result};

/// Stable identifier of a node in a [`Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2-D position of a node on the drawing surface
///
/// Positions exist for driver-side geometry (hit-testing, rendering) only;
/// the shortest-path algorithm never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Squared euclidean distance to another point
    pub fn distance_squared(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Role a node plays in the current search setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Start,
    End,
    Intermediate,
}

/// A node with a stable id and a position for driver-side rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    position: Point,
    role: NodeRole,
}

impl Node {
    /// Creates a new intermediate node at the given position
    pub fn new(id: NodeId, position: Point) -> Self {
        Node {
            id,
            position,
            role: NodeRole::Intermediate,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }
}

/// A weighted edge between two nodes
///
/// An undirected edge is materialized as two independent directed edges when it
/// is added to a graph; editing one afterwards does not touch its mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<W>
where
    W: Float + Zero + Debug + Copy,
{
    pub source: NodeId,
    pub target: NodeId,
    pub weight: W,
    pub directed: bool,
}

impl<W> Edge<W>
where
    W: Float + Zero + Debug + Copy,
{
    pub fn new(source: NodeId, target: NodeId, weight: W, directed: bool) -> Self {
        Edge {
            source,
            target,
            weight,
            directed,
        }
    }

    /// The mirror of this edge: same endpoints reversed, same weight
    fn reversed(&self) -> Self {
        Edge {
            source: self.target,
            target: self.source,
            weight: self.weight,
            directed: self.directed,
        }
    }
}

/// A weighted graph with positioned nodes and adjacency lists
///
/// Nodes keep their insertion order, which hit-testing relies on: lookups
/// return the first match in insertion order rather than the geometrically
/// nearest one. Edge weights are assumed non-negative by the search engine;
/// the graph itself does not validate signs.
#[derive(Debug, Clone)]
pub struct Graph<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Nodes in insertion order
    nodes: Vec<Node>,

    /// Node id -> index into `nodes`
    index: HashMap<NodeId, usize>,

    /// Every edge in the graph, mirrors of undirected edges included
    edges: Vec<Edge<W>>,

    /// Outgoing edges per node, in insertion order
    adjacency: HashMap<NodeId, Vec<Edge<W>>>,

    start: Option<NodeId>,
    end: Option<NodeId>,
}

impl<W> Graph<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Creates a new empty graph
    pub fn new() -> Self {
        Graph {
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            adjacency: HashMap::new(),
            start: None,
            end: None,
        }
    }

    /// Returns the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in the graph (mirrors counted separately)
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if a node with this id exists
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Looks up a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Iterates over nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterates over all edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge<W>> {
        self.edges.iter()
    }

    /// Outgoing edges of a node, in the order they were added
    pub fn outgoing(&self, id: NodeId) -> &[Edge<W>] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Inserts a node; fails if the id is already taken
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(Error::DuplicateId(node.id));
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Inserts an edge; both endpoints must already be in the graph
    ///
    /// An undirected edge also inserts an independent reverse edge with the
    /// same weight.
    pub fn add_edge(&mut self, edge: Edge<W>) -> Result<()> {
        if !self.contains(edge.source) {
            return Err(Error::UnknownNode(edge.source));
        }
        if !self.contains(edge.target) {
            return Err(Error::UnknownNode(edge.target));
        }

        if !edge.directed {
            let reverse = edge.reversed();
            self.push_edge(edge);
            self.push_edge(reverse);
        } else {
            self.push_edge(edge);
        }
        Ok(())
    }

    fn push_edge(&mut self, edge: Edge<W>) {
        self.adjacency
            .entry(edge.source)
            .or_default()
            .push(edge.clone());
        self.edges.push(edge);
    }

    /// Updates the weight of the directed edge `source -> target`
    ///
    /// Only that one direction is touched; the mirror of an undirected edge
    /// keeps its old weight unless updated explicitly. Returns false if no
    /// such edge exists.
    pub fn update_edge_weight(&mut self, source: NodeId, target: NodeId, weight: W) -> bool {
        let mut updated = false;

        if let Some(outgoing) = self.adjacency.get_mut(&source) {
            for edge in outgoing.iter_mut() {
                if edge.target == target {
                    edge.weight = weight;
                    updated = true;
                }
            }
        }
        if updated {
            for edge in self.edges.iter_mut() {
                if edge.source == source && edge.target == target {
                    edge.weight = weight;
                }
            }
        }

        updated
    }

    /// Returns the first node (insertion order) within `radius` of `point`
    pub fn node_at(&self, point: Point, radius: f64) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| node.position.distance_squared(point) <= radius * radius)
    }

    /// Returns the first edge (insertion order) whose segment passes within
    /// `tolerance` of `point`
    pub fn edge_at(&self, point: Point, tolerance: f64) -> Option<&Edge<W>> {
        self.edges.iter().find(|edge| {
            match (self.node(edge.source), self.node(edge.target)) {
                (Some(a), Some(b)) => {
                    point_to_segment_distance(point, a.position, b.position) <= tolerance
                }
                _ => false,
            }
        })
    }

    /// Designates `id` as the start node, demoting any previous start
    pub fn set_start(&mut self, id: NodeId) -> Result<()> {
        let idx = *self.index.get(&id).ok_or(Error::UnknownNode(id))?;
        if let Some(prev) = self.start.take() {
            self.set_role(prev, NodeRole::Intermediate);
        }
        self.nodes[idx].role = NodeRole::Start;
        self.start = Some(id);
        Ok(())
    }

    /// Designates `id` as the end node, demoting any previous end
    pub fn set_end(&mut self, id: NodeId) -> Result<()> {
        let idx = *self.index.get(&id).ok_or(Error::UnknownNode(id))?;
        if let Some(prev) = self.end.take() {
            self.set_role(prev, NodeRole::Intermediate);
        }
        self.nodes[idx].role = NodeRole::End;
        self.end = Some(id);
        Ok(())
    }

    pub fn start_node(&self) -> Option<NodeId> {
        self.start
    }

    pub fn end_node(&self) -> Option<NodeId> {
        self.end
    }

    fn set_role(&mut self, id: NodeId, role: NodeRole) {
        if let Some(&idx) = self.index.get(&id) {
            self.nodes[idx].role = role;
        }
    }
}

impl<W> Default for Graph<W>
where
    W: Float + Zero + Debug + Copy,
{
    fn default() -> Self {
        Graph::new()
    }
}

/// Distance from `p` to the segment `a`-`b`
fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let len_sq = a.distance_squared(b);
    if len_sq == 0.0 {
        return p.distance_squared(a).sqrt();
    }
    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let projection = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    p.distance_squared(projection).sqrt()
}
