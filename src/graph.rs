//! Stream-processing pipeline graphs.
//!
//! A pipeline is a directed multigraph of typed processor nodes over a shared finite value
//! domain. Connections are explicit, port-indexed edges from a source output port to a
//! destination input port; there is no implicit ordering. A graph designates some ports as
//! *external*: one (or, for doubled pipelines, several) input port fed by the environment, and
//! the output port(s) observed by the generated temporal properties.
//!
//! Node identifiers are drawn from a process-global counter, so building the "same" pipeline
//! twice yields structurally identical graphs with *different* ids — which is exactly why the
//! model cache in [`catalog`](crate::catalog) exists.

crate::prelude!();

use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-global node id counter.
static NODE_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Yields a fresh, process-unique node id.
fn fresh_id() -> usize {
    NODE_COUNT.fetch_add(1, Ordering::SeqCst)
}

/// Binary functions usable in an [`NodeKind::Apply`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    /// Integer addition.
    Addition,
    /// Integer multiplication.
    Multiplication,
    /// `first >= second`, boolean output.
    IsGreaterOrEqual,
    /// Value equality, boolean output.
    Equals,
}
impl Func {
    /// Input arity of the function.
    pub fn arity(self) -> usize {
        2
    }
    /// True if the function produces a boolean, not a domain value.
    pub fn boolean_output(self) -> bool {
        matches!(self, Self::IsGreaterOrEqual | Self::Equals)
    }
    /// Short name, used in generated module names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Addition => "add",
            Self::Multiplication => "mul",
            Self::IsGreaterOrEqual => "geq",
            Self::Equals => "eq",
        }
    }
}

/// Fold functions usable in a [`NodeKind::Cumulate`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    /// Running sum.
    Addition,
    /// Running product.
    Multiplication,
}
impl Fold {
    /// Short name, used in generated module names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Addition => "sum",
            Self::Multiplication => "product",
        }
    }
}

/// The processor vocabulary of the pipeline catalog.
#[derive(Debug)]
pub enum NodeKind {
    /// Forwards its input unchanged.
    Passthrough,
    /// Duplicates its single input onto `n` output ports.
    Fork(usize),
    /// Discards the first `n` input values, then forwards the rest (a delay).
    Trim(usize),
    /// Forwards one input value out of every `k`.
    Decimate(usize),
    /// Forwards its first input when its second (boolean) input is true.
    Filter,
    /// Runs an inner sub-pipeline over a sliding window of the given width.
    Window {
        /// The sub-pipeline applied to each window.
        inner: Box<Graph>,
        /// Window width.
        width: usize,
    },
    /// Folds all inputs seen so far with a binary function.
    Cumulate(Fold),
    /// Replaces every input value with a constant.
    TurnInto(usize),
    /// Applies a function to values read from its input ports.
    Apply(Func),
    /// A named sub-pipeline with its own designated entry and exit ports.
    Group(Box<Graph>),
}

/// A node of a pipeline graph.
#[derive(Debug)]
pub struct Node {
    /// Process-unique identifier.
    id: usize,
    /// What the node computes.
    kind: NodeKind,
}
impl Node {
    /// Process-unique identifier of the node.
    pub fn id(&self) -> usize {
        self.id
    }
    /// Kind accessor.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
    /// Number of input ports.
    pub fn in_arity(&self) -> usize {
        match &self.kind {
            NodeKind::Filter => 2,
            NodeKind::Apply(f) => f.arity(),
            NodeKind::Group(inner) => inner.inputs().len(),
            _ => 1,
        }
    }
    /// Number of output ports.
    pub fn out_arity(&self) -> usize {
        match &self.kind {
            NodeKind::Fork(n) => *n,
            NodeKind::Group(inner) => inner.outputs().len(),
            _ => 1,
        }
    }
    /// True if the node emits booleans rather than domain values.
    pub fn boolean_output(&self) -> bool {
        match &self.kind {
            NodeKind::Apply(f) => f.boolean_output(),
            NodeKind::Group(inner) => inner
                .outputs()
                .iter()
                .all(|port| inner.node(port.node).boolean_output()),
            _ => false,
        }
    }
    /// Short kind name, used in generated module names.
    pub fn kind_name(&self) -> String {
        match &self.kind {
            NodeKind::Passthrough => "passthrough".into(),
            NodeKind::Fork(_) => "fork".into(),
            NodeKind::Trim(_) => "trim".into(),
            NodeKind::Decimate(_) => "decimate".into(),
            NodeKind::Filter => "filter".into(),
            NodeKind::Window { .. } => "window".into(),
            NodeKind::Cumulate(f) => format!("cumul_{}", f.name()),
            NodeKind::TurnInto(_) => "turn_into".into(),
            NodeKind::Apply(f) => format!("apply_{}", f.name()),
            NodeKind::Group(_) => "group".into(),
        }
    }
}

/// Index of a node inside one [`Graph`]'s node list.
pub type NodeIdx = usize;

/// A port of a node: the node's index paired with a port number.
///
/// Whether the port number refers to an input or an output port depends on context: edge
/// sources and external outputs use output port numbers, edge destinations and external
/// inputs use input port numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Port {
    /// Node index in the owning graph.
    pub node: NodeIdx,
    /// Port number on that node.
    pub port: usize,
}
impl Port {
    /// Constructor.
    pub fn new(node: NodeIdx, port: usize) -> Self {
        Self { node, port }
    }
}

/// A directed, port-indexed connection between two nodes.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// Source output port.
    pub from: Port,
    /// Destination input port.
    pub to: Port,
}

/// A pipeline graph over a shared finite domain and queue capacity.
#[derive(Debug)]
pub struct Graph {
    /// Cardinality of the value domain (values range over `0 .. domain_size - 1`).
    domain_size: usize,
    /// Capacity of each bounded connection queue.
    queue_size: usize,
    /// Registered nodes.
    nodes: Vec<Node>,
    /// Connections.
    edges: Vec<Edge>,
    /// Designated external input ports.
    inputs: Vec<Port>,
    /// Designated external output ports.
    outputs: Vec<Port>,
}
impl Graph {
    /// Constructor for an empty graph.
    pub fn new(domain_size: usize, queue_size: usize) -> Self {
        Self {
            domain_size,
            queue_size,
            nodes: vec![],
            edges: vec![],
            inputs: vec![],
            outputs: vec![],
        }
    }

    /// Domain cardinality.
    pub fn domain_size(&self) -> usize {
        self.domain_size
    }
    /// Queue capacity.
    pub fn queue_size(&self) -> usize {
        self.queue_size
    }
    /// All registered nodes, in registration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    /// A node by index.
    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }
    /// All connections.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    /// Designated external input ports.
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }
    /// Designated external output ports.
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    /// Registers a node, yielding its index.
    pub fn add(&mut self, kind: NodeKind) -> NodeIdx {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: fresh_id(),
            kind,
        });
        idx
    }

    /// Connects an output port to an input port.
    ///
    /// Wiring mistakes are not caught here but by [`validate`](Self::validate), which runs
    /// before serialization.
    pub fn connect(&mut self, src: NodeIdx, src_port: usize, dst: NodeIdx, dst_port: usize) {
        self.edges.push(Edge {
            from: Port::new(src, src_port),
            to: Port::new(dst, dst_port),
        });
    }

    /// Marks a port as an external input of the pipeline.
    pub fn mark_input(&mut self, port: Port) {
        self.inputs.push(port);
    }
    /// Marks a port as an external output of the pipeline.
    pub fn mark_output(&mut self, port: Port) {
        self.outputs.push(port);
    }

    /// Checks that the graph is well-wired.
    ///
    /// Fails if a connection or designated port references a non-existent node or port, if an
    /// input port is fed more than once, or if a node's input ports are not all fed (by an
    /// edge or by being an external input).
    pub fn validate(&self) -> Res<()> {
        let mut fed: Set<Port> = Set::new();
        for edge in &self.edges {
            self.check_port(edge.from, false)?;
            self.check_port(edge.to, true)?;
            if !fed.insert(edge.to) {
                bail!(
                    "input port {} of node #{} is fed twice",
                    edge.to.port,
                    self.node(edge.to.node).id()
                )
            }
        }
        for port in &self.inputs {
            self.check_port(*port, true)?;
            if !fed.insert(*port) {
                bail!(
                    "external input port {} of node #{} is also fed by an edge",
                    port.port,
                    self.node(port.node).id()
                )
            }
        }
        for port in &self.outputs {
            self.check_port(*port, false)?;
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            for port in 0..node.in_arity() {
                if !fed.contains(&Port::new(idx, port)) {
                    bail!(
                        "input port {} of node #{} ({}) is not connected",
                        port,
                        node.id(),
                        node.kind_name()
                    )
                }
            }
            // Nested pipelines must be well-wired too.
            match node.kind() {
                NodeKind::Window { inner, .. } | NodeKind::Group(inner) => inner.validate()?,
                _ => (),
            }
        }
        Ok(())
    }

    /// Checks that a port exists on its node.
    fn check_port(&self, port: Port, input: bool) -> Res<()> {
        if port.node >= self.nodes.len() {
            bail!("reference to unregistered node index {}", port.node)
        }
        let node = self.node(port.node);
        let arity = if input {
            node.in_arity()
        } else {
            node.out_arity()
        };
        if port.port >= arity {
            bail!(
                "node #{} ({}) has no {} port {}",
                node.id(),
                node.kind_name(),
                if input { "input" } else { "output" },
                port.port
            )
        }
        Ok(())
    }
}

#[cfg(test)]
mod test;
