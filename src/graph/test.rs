//! Tests over graph construction and wiring validation.

crate::prelude!();

use graph::{Func, Graph, NodeKind, Port};

#[test]
fn ids_are_process_unique() {
    let mut graph = Graph::new(3, 2);
    let fst = graph.add(NodeKind::Passthrough);
    let snd = graph.add(NodeKind::Passthrough);
    assert_ne!(graph.node(fst).id(), graph.node(snd).id());

    let mut other = Graph::new(3, 2);
    let third = other.add(NodeKind::Passthrough);
    assert_ne!(graph.node(fst).id(), other.node(third).id());
    assert_ne!(graph.node(snd).id(), other.node(third).id());
}

#[test]
fn arities_follow_node_kind() {
    let mut graph = Graph::new(3, 2);
    let fork = graph.add(NodeKind::Fork(3));
    assert_eq!(graph.node(fork).in_arity(), 1);
    assert_eq!(graph.node(fork).out_arity(), 3);
    let filter = graph.add(NodeKind::Filter);
    assert_eq!(graph.node(filter).in_arity(), 2);
    assert_eq!(graph.node(filter).out_arity(), 1);
    let geq = graph.add(NodeKind::Apply(Func::IsGreaterOrEqual));
    assert_eq!(graph.node(geq).in_arity(), 2);
    assert!(graph.node(geq).boolean_output());
    let add = graph.add(NodeKind::Apply(Func::Addition));
    assert!(!graph.node(add).boolean_output());
}

#[test]
fn validates_well_wired_graph() {
    let mut graph = Graph::new(3, 2);
    let fork = graph.add(NodeKind::Fork(2));
    let add = graph.add(NodeKind::Apply(Func::Addition));
    graph.connect(fork, 0, add, 0);
    graph.connect(fork, 1, add, 1);
    graph.mark_input(Port::new(fork, 0));
    graph.mark_output(Port::new(add, 0));
    graph.validate().unwrap();
}

#[test]
fn rejects_unconnected_input_port() {
    let mut graph = Graph::new(3, 2);
    let fork = graph.add(NodeKind::Fork(2));
    let add = graph.add(NodeKind::Apply(Func::Addition));
    graph.connect(fork, 0, add, 0);
    // `add`'s second port is left dangling.
    graph.mark_input(Port::new(fork, 0));
    graph.mark_output(Port::new(add, 0));
    let err = graph.validate().unwrap_err();
    assert!(err.to_string().contains("not connected"));
}

#[test]
fn rejects_doubly_fed_input_port() {
    let mut graph = Graph::new(3, 2);
    let fork = graph.add(NodeKind::Fork(2));
    let sink = graph.add(NodeKind::Passthrough);
    graph.connect(fork, 0, sink, 0);
    graph.connect(fork, 1, sink, 0);
    graph.mark_input(Port::new(fork, 0));
    graph.mark_output(Port::new(sink, 0));
    let err = graph.validate().unwrap_err();
    assert!(err.to_string().contains("fed twice"));
}

#[test]
fn rejects_out_of_range_port() {
    let mut graph = Graph::new(3, 2);
    let node = graph.add(NodeKind::Passthrough);
    graph.mark_input(Port::new(node, 0));
    graph.mark_output(Port::new(node, 1));
    let err = graph.validate().unwrap_err();
    assert!(err.to_string().contains("has no output port 1"));
}

#[test]
fn rejects_unregistered_node() {
    let mut graph = Graph::new(3, 2);
    let node = graph.add(NodeKind::Passthrough);
    graph.mark_input(Port::new(node, 0));
    graph.mark_output(Port::new(node + 1, 0));
    let err = graph.validate().unwrap_err();
    assert!(err.to_string().contains("unregistered node"));
}

#[test]
fn validates_nested_pipelines() {
    let mut graph = Graph::new(3, 2);
    // Inner sub-pipeline with a dangling filter port.
    let mut inner = Graph::new(3, 2);
    let filter = inner.add(NodeKind::Filter);
    inner.mark_input(Port::new(filter, 0));
    inner.mark_output(Port::new(filter, 0));
    let group = graph.add(NodeKind::Group(Box::new(inner)));
    graph.mark_input(Port::new(group, 0));
    graph.mark_output(Port::new(group, 0));
    assert!(graph.validate().is_err());
}
