use ordered_float::OrderedFloat;
use step_sssp::{Edge, Error, Graph, Node, NodeId, NodeRole, Point};

type W = OrderedFloat<f64>;

fn w(x: f64) -> W {
    OrderedFloat(x)
}

fn node(id: usize, x: f64, y: f64) -> Node {
    Node::new(NodeId(id), Point::new(x, y))
}

#[test]
fn test_duplicate_node_id_is_rejected() {
    let mut graph: Graph<W> = Graph::new();
    graph.add_node(node(1, 0.0, 0.0)).unwrap();

    let err = graph.add_node(node(1, 50.0, 50.0)).unwrap_err();
    assert_eq!(err, Error::DuplicateId(NodeId(1)));
    assert_eq!(graph.node_count(), 1, "rejected insert must not mutate");
}

#[test]
fn test_edge_requires_known_endpoints() {
    let mut graph: Graph<W> = Graph::new();
    graph.add_node(node(1, 0.0, 0.0)).unwrap();

    let err = graph
        .add_edge(Edge::new(NodeId(1), NodeId(9), w(2.0), true))
        .unwrap_err();
    assert_eq!(err, Error::UnknownNode(NodeId(9)));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_undirected_edge_materializes_mirror() {
    let mut graph: Graph<W> = Graph::new();
    graph.add_node(node(1, 0.0, 0.0)).unwrap();
    graph.add_node(node(2, 100.0, 0.0)).unwrap();

    graph
        .add_edge(Edge::new(NodeId(1), NodeId(2), w(4.0), false))
        .unwrap();

    assert_eq!(graph.edge_count(), 2, "undirected edge stores both directions");
    assert_eq!(graph.outgoing(NodeId(1)).len(), 1);
    assert_eq!(graph.outgoing(NodeId(2)).len(), 1);

    let mirror = &graph.outgoing(NodeId(2))[0];
    assert_eq!(mirror.source, NodeId(2));
    assert_eq!(mirror.target, NodeId(1));
    assert_eq!(mirror.weight, w(4.0));
    assert!(!mirror.directed);
}

#[test]
fn test_directed_edge_has_no_mirror() {
    let mut graph: Graph<W> = Graph::new();
    graph.add_node(node(1, 0.0, 0.0)).unwrap();
    graph.add_node(node(2, 100.0, 0.0)).unwrap();

    graph
        .add_edge(Edge::new(NodeId(1), NodeId(2), w(4.0), true))
        .unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert!(graph.outgoing(NodeId(2)).is_empty());
}

#[test]
fn test_adjacency_keeps_insertion_order() {
    let mut graph: Graph<W> = Graph::new();
    for id in 0..4 {
        graph.add_node(node(id, id as f64 * 10.0, 0.0)).unwrap();
    }
    graph
        .add_edge(Edge::new(NodeId(0), NodeId(3), w(1.0), true))
        .unwrap();
    graph
        .add_edge(Edge::new(NodeId(0), NodeId(1), w(1.0), true))
        .unwrap();
    graph
        .add_edge(Edge::new(NodeId(0), NodeId(2), w(1.0), true))
        .unwrap();

    let targets: Vec<NodeId> = graph.outgoing(NodeId(0)).iter().map(|e| e.target).collect();
    assert_eq!(targets, vec![NodeId(3), NodeId(1), NodeId(2)]);
}

#[test]
fn test_node_hit_testing_prefers_insertion_order() {
    let mut graph: Graph<W> = Graph::new();
    graph.add_node(node(1, 100.0, 100.0)).unwrap();
    graph.add_node(node(2, 105.0, 100.0)).unwrap();

    // Both nodes are within 20 units of the click; the first inserted wins.
    let hit = graph.node_at(Point::new(102.0, 100.0), 20.0).unwrap();
    assert_eq!(hit.id(), NodeId(1));

    assert!(graph.node_at(Point::new(500.0, 500.0), 20.0).is_none());

    // The radius is inclusive.
    let boundary = graph.node_at(Point::new(120.0, 100.0), 20.0).unwrap();
    assert_eq!(boundary.id(), NodeId(1));
}

#[test]
fn test_edge_hit_testing() {
    let mut graph: Graph<W> = Graph::new();
    graph.add_node(node(1, 0.0, 0.0)).unwrap();
    graph.add_node(node(2, 10.0, 0.0)).unwrap();
    graph
        .add_edge(Edge::new(NodeId(1), NodeId(2), w(1.0), true))
        .unwrap();

    // Near the middle of the segment.
    assert!(graph.edge_at(Point::new(5.0, 2.0), 3.0).is_some());
    assert!(graph.edge_at(Point::new(5.0, 2.0), 1.0).is_none());

    // Past an endpoint the distance is measured to the endpoint itself.
    assert!(graph.edge_at(Point::new(15.0, 0.0), 4.0).is_none());
    assert!(graph.edge_at(Point::new(15.0, 0.0), 6.0).is_some());
}

#[test]
fn test_start_and_end_roles_demote_previous() {
    let mut graph: Graph<W> = Graph::new();
    graph.add_node(node(1, 0.0, 0.0)).unwrap();
    graph.add_node(node(2, 10.0, 0.0)).unwrap();
    graph.add_node(node(3, 20.0, 0.0)).unwrap();

    graph.set_start(NodeId(1)).unwrap();
    graph.set_end(NodeId(3)).unwrap();
    graph.set_start(NodeId(2)).unwrap();

    assert_eq!(graph.node(NodeId(1)).unwrap().role(), NodeRole::Intermediate);
    assert_eq!(graph.node(NodeId(2)).unwrap().role(), NodeRole::Start);
    assert_eq!(graph.node(NodeId(3)).unwrap().role(), NodeRole::End);
    assert_eq!(graph.start_node(), Some(NodeId(2)));
    assert_eq!(graph.end_node(), Some(NodeId(3)));

    let err = graph.set_end(NodeId(9)).unwrap_err();
    assert_eq!(err, Error::UnknownNode(NodeId(9)));
    assert_eq!(graph.end_node(), Some(NodeId(3)));
}

#[test]
fn test_update_edge_weight_touches_one_direction() {
    let mut graph: Graph<W> = Graph::new();
    graph.add_node(node(1, 0.0, 0.0)).unwrap();
    graph.add_node(node(2, 10.0, 0.0)).unwrap();
    graph
        .add_edge(Edge::new(NodeId(1), NodeId(2), w(4.0), false))
        .unwrap();

    assert!(graph.update_edge_weight(NodeId(1), NodeId(2), w(7.0)));

    // Only the edited direction changes; the mirror keeps its weight.
    assert_eq!(graph.outgoing(NodeId(1))[0].weight, w(7.0));
    assert_eq!(graph.outgoing(NodeId(2))[0].weight, w(4.0));

    let global: Vec<W> = graph.edges().map(|e| e.weight).collect();
    assert_eq!(global, vec![w(7.0), w(4.0)]);

    assert!(!graph.update_edge_weight(NodeId(2), NodeId(9), w(1.0)));
}

#[test]
fn test_edge_report_payload_serializes() {
    let edge: Edge<W> = Edge::new(NodeId(1), NodeId(2), w(2.5), true);
    let json = serde_json::to_value(&edge).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "source": 1,
            "target": 2,
            "weight": 2.5,
            "directed": true,
        })
    );
}
