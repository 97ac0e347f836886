//! Compilation of pipeline graphs to NuSMV model text.
//!
//! The compiler assigns every variable of the generated model a deterministic name derived
//! from node ids and port numbers. Three naming conventions are contracts with the rest of the
//! crate (property generation and model introspection rely on them):
//!
//! - external input ports of `main` are `inc_<i>` (contents) and `inb_<i>` (occupancy array);
//! - external output ports of `main` are `oc_<o>` (contents) and `ob_<o>` (occupancy array);
//! - every bounded queue is a boolean array `qb_<j>` whose **last** index is the queue-full
//!   flag.
//!
//! Only the structural part of the model is emitted (module and variable declarations plus
//! wiring comments); the processors' transition semantics are out of scope, NuSMV treats the
//! unconstrained variables nondeterministically.

crate::prelude!();

use graph::{Graph, Node, NodeIdx, NodeKind, Port};

/// Name prefix of external input contents variables.
pub const INPUT_PREFIX: &str = "inc_";
/// Name prefix of external input occupancy arrays.
pub const INPUT_QUEUE_PREFIX: &str = "inb_";
/// Name prefix of external output contents variables.
pub const OUTPUT_PREFIX: &str = "oc_";
/// Name prefix of external output occupancy arrays.
pub const OUTPUT_QUEUE_PREFIX: &str = "ob_";
/// Name prefix of bounded queue occupancy arrays.
pub const QUEUE_PREFIX: &str = "qb_";
/// Name of the top-level module.
pub const MAIN: &str = "main";

/// Type of a generated SMV variable.
#[derive(Debug, Clone)]
pub enum SmvType {
    /// A boolean.
    Boolean,
    /// An integer range `0..max` (inclusive).
    Range(usize),
    /// A fixed-width boolean array `array 0..size-1 of boolean`.
    BoolArray(usize),
    /// An instance of a nested module.
    Instance(Rc<SmvModule>),
}
impl SmvType {
    /// The nested module, if the variable is a module instance.
    pub fn instance(&self) -> Option<&Rc<SmvModule>> {
        match self {
            Self::Instance(module) => Some(module),
            _ => None,
        }
    }
}
impl fmt::Display for SmvType {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Boolean => write!(fmt, "boolean"),
            Self::Range(max) => write!(fmt, "0..{}", max),
            Self::BoolArray(size) => write!(fmt, "array 0..{} of boolean", size - 1),
            Self::Instance(module) => write!(fmt, "{}", module.name),
        }
    }
}

/// A variable declared by a generated SMV module.
#[derive(Debug, Clone)]
pub struct SmvVar {
    /// Variable name, local to its module.
    pub name: String,
    /// Variable type.
    pub typ: SmvType,
}

/// A generated SMV module: a name and its declared variables.
#[derive(Debug, Clone)]
pub struct SmvModule {
    /// Module name.
    pub name: String,
    /// Declared variables, in declaration order.
    pub vars: Vec<SmvVar>,
}
impl SmvModule {
    /// Renders the module definition alone.
    fn render_decl(&self, out: &mut String) {
        out.push_str("MODULE ");
        out.push_str(&self.name);
        out.push('\n');
        if !self.vars.is_empty() {
            out.push_str("  VAR\n");
            for var in &self.vars {
                out.push_str(&format!("    {} : {};\n", var.name, var.typ));
            }
        }
        out.push('\n');
    }

    /// Renders the module definition, then (recursively) its nested module definitions.
    fn render(&self, out: &mut String) {
        self.render_decl(out);
        for var in &self.vars {
            if let Some(module) = var.typ.instance() {
                module.render(out)
            }
        }
    }
}

/// Result of compiling a pipeline graph.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// Full model text.
    text: String,
    /// Top-level node modules, in node registration order. Nested modules are reachable
    /// through [`SmvType::Instance`] variables.
    modules: Vec<Rc<SmvModule>>,
    /// The top-level module.
    main: Rc<SmvModule>,
}
impl Compiled {
    /// Full model text.
    pub fn text(&self) -> &str {
        &self.text
    }
    /// Top-level node modules.
    pub fn modules(&self) -> &[Rc<SmvModule>] {
        &self.modules
    }
    /// The `main` module.
    pub fn main(&self) -> &Rc<SmvModule> {
        &self.main
    }
}

/// Compiles a pipeline graph to NuSMV model text.
///
/// Fails if the graph is not well-wired, see [`Graph::validate`].
pub fn compile(graph: &Graph) -> Res<Compiled> {
    graph.validate()?;
    let mut modules = Vec::with_capacity(graph.nodes().len());
    for (idx, node) in graph.nodes().iter().enumerate() {
        modules.push(node_module(graph, idx, node));
    }
    let main = Rc::new(main_module(graph, &modules));

    let mut text = String::new();
    for module in &modules {
        module.render(&mut text);
    }
    main.render_decl(&mut text);
    render_wiring(graph, &mut text);
    Ok(Compiled {
        text,
        modules,
        main,
    })
}

/// Builds the module of a single node.
///
/// Each input port gets a contents variable `qc_<j>` and a queue occupancy array `qb_<j>`;
/// nested pipelines (windows and groups) additionally get one instance variable per inner
/// node.
fn node_module(graph: &Graph, idx: NodeIdx, node: &Node) -> Rc<SmvModule> {
    let booleans = boolean_feeds(graph);
    let mut vars = vec![];
    for port in 0..node.in_arity() {
        let contents = if booleans.contains(&Port::new(idx, port)) {
            SmvType::Boolean
        } else {
            SmvType::Range(graph.domain_size() - 1)
        };
        vars.push(SmvVar {
            name: format!("qc_{}", port),
            typ: contents,
        });
        vars.push(SmvVar {
            name: format!("{}{}", QUEUE_PREFIX, port),
            typ: SmvType::BoolArray(graph.queue_size()),
        });
    }
    match node.kind() {
        NodeKind::Window { inner, .. } | NodeKind::Group(inner) => {
            for (inner_idx, inner_node) in inner.nodes().iter().enumerate() {
                vars.push(SmvVar {
                    name: format!("p{}", inner_node.id()),
                    typ: SmvType::Instance(node_module(inner, inner_idx, inner_node)),
                });
            }
        }
        _ => (),
    }
    Rc::new(SmvModule {
        name: format!("{}_{}", node.kind_name(), node.id()),
        vars,
    })
}

/// Builds the `main` module: external input ports, one instance per top-level node, external
/// output ports.
fn main_module(graph: &Graph, node_modules: &[Rc<SmvModule>]) -> SmvModule {
    let mut vars = vec![];
    for (idx, _) in graph.inputs().iter().enumerate() {
        vars.push(SmvVar {
            name: format!("{}{}", INPUT_PREFIX, idx),
            typ: SmvType::Range(graph.domain_size() - 1),
        });
        vars.push(SmvVar {
            name: format!("{}{}", INPUT_QUEUE_PREFIX, idx),
            typ: SmvType::BoolArray(graph.queue_size()),
        });
    }
    for (node, module) in graph.nodes().iter().zip(node_modules) {
        vars.push(SmvVar {
            name: format!("p{}", node.id()),
            typ: SmvType::Instance(module.clone()),
        });
    }
    for (idx, port) in graph.outputs().iter().enumerate() {
        let contents = if graph.node(port.node).boolean_output() {
            SmvType::Boolean
        } else {
            SmvType::Range(graph.domain_size() - 1)
        };
        vars.push(SmvVar {
            name: format!("{}{}", OUTPUT_PREFIX, idx),
            typ: contents,
        });
        vars.push(SmvVar {
            name: format!("{}{}", OUTPUT_QUEUE_PREFIX, idx),
            typ: SmvType::BoolArray(graph.queue_size()),
        });
    }
    SmvModule {
        name: MAIN.into(),
        vars,
    }
}

/// Appends the pipeline's wiring as comments, so that differently-wired graphs over the same
/// nodes produce different text.
fn render_wiring(graph: &Graph, out: &mut String) {
    out.push_str("-- wiring\n");
    for (idx, port) in graph.inputs().iter().enumerate() {
        out.push_str(&format!(
            "--   in {} -> p{}:{}\n",
            idx,
            graph.node(port.node).id(),
            port.port
        ));
    }
    for edge in graph.edges() {
        out.push_str(&format!(
            "--   p{}:{} -> p{}:{}\n",
            graph.node(edge.from.node).id(),
            edge.from.port,
            graph.node(edge.to.node).id(),
            edge.to.port
        ));
    }
    for (idx, port) in graph.outputs().iter().enumerate() {
        out.push_str(&format!(
            "--   p{}:{} -> out {}\n",
            graph.node(port.node).id(),
            port.port,
            idx
        ));
    }
}

/// Input ports fed by a boolean-producing node.
fn boolean_feeds(graph: &Graph) -> Set<Port> {
    let mut set = Set::new();
    for edge in graph.edges() {
        if graph.node(edge.from.node).boolean_output() {
            set.insert(edge.to);
        }
    }
    set
}
