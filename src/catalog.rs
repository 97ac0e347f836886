//! The fixed catalog of benchmark pipelines, and the model cache.
//!
//! Each benchmark query is a named constructor over a pipeline [`Graph`]; comparison queries
//! carry two constructors, one per branch. Requesting an equivalence property doubles a
//! pipeline: a single external input is forked into two independently-constructed branches,
//! whose outputs are either both exposed (step-wise equivalence) or compared by an equality
//! node (whole-sequence equivalence).
//!
//! Because node ids are process-unique, building the same configuration twice yields the same
//! structure under *different* variable names. The [`Library`] cache guarantees that a given
//! configuration is built and compiled exactly once, so the port ids a property is generated
//! against always match the model text it is checked against.

crate::prelude!();

use std::time::Instant;

use graph::{Fold, Func, Graph, NodeKind, Port};
use model::Model;
use props::{Equivalence, Prop};

/// The benchmark queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Query {
    /// Forwards the input stream unchanged.
    Passthrough,
    /// Running product of the input stream.
    Product,
    /// Product of each value with the `k`-th next one (decimation).
    ProductOneKth,
    /// Running product over a sliding window of width `k`.
    SumWindowK,
    /// Sum of 1s, folded over a sliding window.
    WinSumOfOnes,
    /// Running sum of doubled values.
    SumOfDoubles,
    /// Forwards values while the running count is below `k`.
    OutputIfSmallerK,
    /// Window sum of width 2, direct vs trim-and-add formulation.
    CompareWindowSum2,
    /// Window sum of width 3, direct vs trim-and-add formulation.
    CompareWindowSum3,
    /// Passthrough vs a one-step delay.
    ComparePassthroughDelay,
}
impl Query {
    /// All queries of the catalog.
    pub const ALL: [Query; 10] = [
        Self::Passthrough,
        Self::Product,
        Self::ProductOneKth,
        Self::SumWindowK,
        Self::WinSumOfOnes,
        Self::SumOfDoubles,
        Self::OutputIfSmallerK,
        Self::CompareWindowSum2,
        Self::CompareWindowSum3,
        Self::ComparePassthroughDelay,
    ];

    /// Benchmark name of the query.
    pub fn name(self) -> &'static str {
        match self {
            Self::Passthrough => "Passthrough",
            Self::Product => "Product",
            Self::ProductOneKth => "Product of 1 and k-th",
            Self::SumWindowK => "Sum of window of width 3",
            Self::WinSumOfOnes => "Sum of 1s on window",
            Self::SumOfDoubles => "Sum of doubles",
            Self::OutputIfSmallerK => "Output if smaller than k",
            Self::CompareWindowSum2 => "Window sum of 2 comparison",
            Self::CompareWindowSum3 => "Window sum of 3 comparison",
            Self::ComparePassthroughDelay => "Passthrough vs delay comparison",
        }
    }

    /// Query from its benchmark name, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|query| query.name() == name)
    }

    /// Default shape parameter, for queries that take one.
    pub fn default_param(self) -> Option<usize> {
        match self {
            Self::ProductOneKth | Self::SumWindowK | Self::WinSumOfOnes | Self::OutputIfSmallerK => {
                Some(3)
            }
            _ => None,
        }
    }

    /// True for dual-pipeline comparison queries.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::CompareWindowSum2 | Self::CompareWindowSum3 | Self::ComparePassthroughDelay
        )
    }

    /// Whether the query can be built at all for a domain of the given cardinality.
    ///
    /// Some pipelines inject constants that must exist in the domain: `Sum of doubles` needs
    /// the constant 2 (and room for a doubled value), `Output if smaller than k` needs the
    /// threshold `k` itself.
    pub fn feasible(self, domain_size: usize, param: Option<usize>) -> bool {
        match self {
            Self::SumOfDoubles => domain_size >= 3,
            Self::OutputIfSmallerK => param.map(|k| domain_size > k).unwrap_or(true),
            _ => true,
        }
    }

    /// The constructor(s) of the query.
    fn shape(self) -> Shape {
        match self {
            Self::Passthrough => Shape::Direct(passthrough),
            Self::Product => Shape::Direct(product),
            Self::ProductOneKth => Shape::Direct(product_one_kth),
            Self::SumWindowK => Shape::Direct(sum_window_k),
            Self::WinSumOfOnes => Shape::Direct(win_sum_of_ones),
            Self::SumOfDoubles => Shape::Direct(sum_of_doubles),
            Self::OutputIfSmallerK => Shape::Direct(output_if_smaller_k),
            Self::CompareWindowSum2 => Shape::Compare(window_sum_group_2, trim_sum_group_2),
            Self::CompareWindowSum3 => Shape::Compare(window_sum_group_3, trim_sum_group_3),
            Self::ComparePassthroughDelay => Shape::Compare(passthrough, delay),
        }
    }
}

/// A benchmark configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Pipeline to build.
    pub query: Query,
    /// Domain cardinality (values range over `0 .. domain_size - 1`).
    pub domain_size: usize,
    /// Queue capacity.
    pub queue_size: usize,
    /// Shape parameter; `None` or `Some(0)` means "use the query's default".
    pub param: Option<usize>,
    /// Property to verify.
    pub property: Prop,
}
impl Config {
    /// The shape parameter actually used: the configured one if positive, otherwise the
    /// query's default.
    pub fn effective_param(&self) -> Option<usize> {
        match self.param {
            Some(k) if k > 0 => Some(k),
            _ => self.query.default_param(),
        }
    }
}

/// Structural cache identity of a configuration.
///
/// Two configurations are cache-equal when query, queue capacity, domain cardinality and
/// effective shape parameter match; the property participates only when it is an equivalence
/// flavor, since that is exactly when it changes the constructed topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModelKey {
    /// Query.
    query: Query,
    /// Queue capacity.
    queue_size: usize,
    /// Domain cardinality.
    domain_size: usize,
    /// Effective shape parameter.
    param: Option<usize>,
    /// The property, for equivalence flavors only.
    property: Option<Prop>,
}
impl ModelKey {
    /// The cache key of a configuration.
    pub fn of(config: &Config) -> Self {
        Self {
            query: config.query,
            queue_size: config.queue_size,
            domain_size: config.domain_size,
            param: config.effective_param(),
            property: if config.property.equivalence().is_some() {
                Some(config.property)
            } else {
                None
            },
        }
    }
}

/// A pipeline constructor: registers nodes and edges on the graph and yields the designated
/// (entry input port, exit output port) pair.
type Creator = fn(&mut Graph, usize) -> (Port, Port);

/// One constructor for direct queries, two for comparison queries.
enum Shape {
    /// Direct query.
    Direct(Creator),
    /// Dual-pipeline comparison query.
    Compare(Creator, Creator),
}

/// Builds the pipeline graph of a configuration.
///
/// Yields `None` when the configuration is infeasible for its domain, see
/// [`Query::feasible`]; this means "no experiment", not an error.
pub fn build(config: &Config) -> Option<(Graph, Option<usize>)> {
    let param = config.effective_param();
    if !config.query.feasible(config.domain_size, param) {
        return None;
    }
    let k = param.unwrap_or(0);
    let mut graph = Graph::new(config.domain_size, config.queue_size);
    let flavor = config.property.equivalence();
    match (config.query.shape(), flavor) {
        (Shape::Direct(create), None) => {
            let (entry, exit) = create(&mut graph, k);
            graph.mark_input(entry);
            graph.mark_output(exit);
        }
        (Shape::Direct(create), Some(flavor)) => {
            doubled(&mut graph, create, create, k, Some(flavor));
        }
        (Shape::Compare(lft, rgt), flavor) => {
            doubled(&mut graph, lft, rgt, k, flavor);
        }
    }
    Some((graph, param))
}

/// Forks one external input into two branches.
///
/// Step-wise equivalence (and comparison queries under non-equivalence properties) exposes
/// both branch outputs; whole-sequence equivalence compares them with an equality node and
/// exposes its single boolean output.
fn doubled(graph: &mut Graph, lft: Creator, rgt: Creator, k: usize, flavor: Option<Equivalence>) {
    let fork = graph.add(NodeKind::Fork(2));
    graph.mark_input(Port::new(fork, 0));
    let (lft_entry, lft_exit) = lft(graph, k);
    graph.connect(fork, 0, lft_entry.node, lft_entry.port);
    let (rgt_entry, rgt_exit) = rgt(graph, k);
    graph.connect(fork, 1, rgt_entry.node, rgt_entry.port);
    match flavor {
        Some(Equivalence::Sequence) => {
            let eq = graph.add(NodeKind::Apply(Func::Equals));
            graph.connect(lft_exit.node, lft_exit.port, eq, 0);
            graph.connect(rgt_exit.node, rgt_exit.port, eq, 1);
            graph.mark_output(Port::new(eq, 0));
        }
        _ => {
            graph.mark_output(lft_exit);
            graph.mark_output(rgt_exit);
        }
    }
}

/// The model cache.
///
/// Populated exactly once per distinct [`ModelKey`], never evicted; infeasible
/// configurations are cached as `None` too. Lookup performs construction as a side effect,
/// so access from several threads would need external serialization — the cache itself is
/// single-threaded.
#[derive(Debug, Default)]
pub struct Library {
    /// Cached models, by structural identity.
    cache: Map<ModelKey, Option<Rc<Model>>>,
}
impl Library {
    /// Constructor for an empty library.
    pub fn new() -> Self {
        Self { cache: Map::new() }
    }

    /// Number of cached entries, infeasible ones included.
    pub fn len(&self) -> usize {
        self.cache.len()
    }
    /// True if nothing has been built yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// The model for a configuration, built and compiled on first request.
    ///
    /// Yields `Ok(None)` for infeasible configurations. Fails only on an internal wiring
    /// error, which a fixed catalog should never produce.
    pub fn get_or_build(&mut self, config: &Config) -> Res<Option<Rc<Model>>> {
        let key = ModelKey::of(config);
        if let Some(cached) = self.cache.get(&key) {
            debug!("model cache hit for {:?}", config.query);
            return Ok(cached.clone());
        }
        debug!("model cache miss for {:?}, building", config.query);
        let entry = match build(config) {
            None => None,
            Some((graph, param)) => {
                let start = Instant::now();
                let compiled = smv::compile(&graph)
                    .chain_err(|| format!("while compiling query `{}`", config.query.name()))?;
                let generation_ms = start.elapsed().as_millis() as u64;
                Some(Rc::new(Model::new(
                    config.query.name(),
                    config.queue_size,
                    config.domain_size,
                    param,
                    compiled,
                    generation_ms,
                )))
            }
        };
        self.cache.insert(key, entry.clone());
        Ok(entry)
    }
}

// Pipeline constructors. Wiring follows the benchmark's reference pipelines; entry/exit are
// the ports later designated as the pipeline's external input and output.

/// A single passthrough node.
fn passthrough(graph: &mut Graph, _k: usize) -> (Port, Port) {
    let node = graph.add(NodeKind::Passthrough);
    (Port::new(node, 0), Port::new(node, 0))
}

/// A one-step delay.
fn delay(graph: &mut Graph, _k: usize) -> (Port, Port) {
    let node = graph.add(NodeKind::Trim(1));
    (Port::new(node, 0), Port::new(node, 0))
}

/// Running product.
fn product(graph: &mut Graph, _k: usize) -> (Port, Port) {
    let node = graph.add(NodeKind::Cumulate(Fold::Multiplication));
    (Port::new(node, 0), Port::new(node, 0))
}

/// Each value multiplied with the `k`-th next one.
fn product_one_kth(graph: &mut Graph, k: usize) -> (Port, Port) {
    let fork = graph.add(NodeKind::Fork(2));
    let mul = graph.add(NodeKind::Apply(Func::Multiplication));
    let dec = graph.add(NodeKind::Decimate(k));
    graph.connect(fork, 0, mul, 0);
    graph.connect(fork, 1, dec, 0);
    graph.connect(dec, 0, mul, 1);
    (Port::new(fork, 0), Port::new(mul, 0))
}

/// Running product folded over a sliding window of width `k`.
fn sum_window_k(graph: &mut Graph, k: usize) -> (Port, Port) {
    let win = graph.add(NodeKind::Window {
        inner: Box::new(fold_pipeline(graph, Fold::Multiplication)),
        width: k,
    });
    (Port::new(win, 0), Port::new(win, 0))
}

/// Turn every value into 1, sum, then fold a window of width `k`.
fn win_sum_of_ones(graph: &mut Graph, k: usize) -> (Port, Port) {
    let one = graph.add(NodeKind::TurnInto(1));
    let sum = graph.add(NodeKind::Cumulate(Fold::Addition));
    graph.connect(one, 0, sum, 0);
    let win = graph.add(NodeKind::Window {
        inner: Box::new(fold_pipeline(graph, Fold::Multiplication)),
        width: k,
    });
    graph.connect(sum, 0, win, 0);
    (Port::new(one, 0), Port::new(win, 0))
}

/// Running sum of values doubled by multiplication with the constant 2.
fn sum_of_doubles(graph: &mut Graph, _k: usize) -> (Port, Port) {
    let fork = graph.add(NodeKind::Fork(2));
    let mul = graph.add(NodeKind::Apply(Func::Multiplication));
    let two = graph.add(NodeKind::TurnInto(2));
    graph.connect(fork, 0, mul, 0);
    graph.connect(fork, 1, two, 0);
    graph.connect(two, 0, mul, 1);
    let sum = graph.add(NodeKind::Cumulate(Fold::Addition));
    graph.connect(mul, 0, sum, 0);
    (Port::new(fork, 0), Port::new(sum, 0))
}

/// Forwards values while the running count stays below the threshold `k`.
fn output_if_smaller_k(graph: &mut Graph, k: usize) -> (Port, Port) {
    let fork = graph.add(NodeKind::Fork(3));
    let filter = graph.add(NodeKind::Filter);
    graph.connect(fork, 0, filter, 0);
    let turn_k = graph.add(NodeKind::TurnInto(k));
    graph.connect(fork, 1, turn_k, 0);
    let turn_1 = graph.add(NodeKind::TurnInto(1));
    graph.connect(fork, 2, turn_1, 0);
    let sum = graph.add(NodeKind::Cumulate(Fold::Addition));
    graph.connect(turn_1, 0, sum, 0);
    let geq = graph.add(NodeKind::Apply(Func::IsGreaterOrEqual));
    graph.connect(turn_k, 0, geq, 0);
    graph.connect(sum, 0, geq, 1);
    graph.connect(geq, 0, filter, 1);
    (Port::new(fork, 0), Port::new(filter, 0))
}

/// Window-sum branch: a group wrapping a width-2 window over a running sum.
fn window_sum_group_2(graph: &mut Graph, _k: usize) -> (Port, Port) {
    window_sum_group(graph, 2)
}
/// Window-sum branch: a group wrapping a width-3 window over a running sum.
fn window_sum_group_3(graph: &mut Graph, _k: usize) -> (Port, Port) {
    window_sum_group(graph, 3)
}
/// Trim-and-add branch equivalent to a width-2 window sum.
fn trim_sum_group_2(graph: &mut Graph, _k: usize) -> (Port, Port) {
    trim_sum_group(graph, 2)
}
/// Trim-and-add branch equivalent to a width-3 window sum.
fn trim_sum_group_3(graph: &mut Graph, _k: usize) -> (Port, Port) {
    trim_sum_group(graph, 3)
}

/// A group wrapping `Window(Cumulate(+), width)`.
fn window_sum_group(graph: &mut Graph, width: usize) -> (Port, Port) {
    let mut inner = Graph::new(graph.domain_size(), graph.queue_size());
    let win = inner.add(NodeKind::Window {
        inner: Box::new(fold_pipeline(graph, Fold::Addition)),
        width,
    });
    inner.mark_input(Port::new(win, 0));
    inner.mark_output(Port::new(win, 0));
    let group = graph.add(NodeKind::Group(Box::new(inner)));
    (Port::new(group, 0), Port::new(group, 0))
}

/// A group summing the last `width` values by forking, trimming and adding.
///
/// For width `w`, the input is forked `w` ways; branch `i` is delayed by `i` steps and the
/// branches are added pairwise.
fn trim_sum_group(graph: &mut Graph, width: usize) -> (Port, Port) {
    let mut inner = Graph::new(graph.domain_size(), graph.queue_size());
    let fork = inner.add(NodeKind::Fork(width));
    let mut acc = Port::new(fork, 0);
    for step in 1..width {
        let trim = inner.add(NodeKind::Trim(step));
        inner.connect(fork, step, trim, 0);
        let add = inner.add(NodeKind::Apply(Func::Addition));
        inner.connect(acc.node, acc.port, add, 0);
        inner.connect(trim, 0, add, 1);
        acc = Port::new(add, 0);
    }
    inner.mark_input(Port::new(fork, 0));
    inner.mark_output(acc);
    let group = graph.add(NodeKind::Group(Box::new(inner)));
    (Port::new(group, 0), Port::new(group, 0))
}

/// A one-node sub-pipeline folding its input with the given function, used as window body.
fn fold_pipeline(graph: &Graph, fold: Fold) -> Graph {
    let mut inner = Graph::new(graph.domain_size(), graph.queue_size());
    let node = inner.add(NodeKind::Cumulate(fold));
    inner.mark_input(Port::new(node, 0));
    inner.mark_output(Port::new(node, 0));
    inner
}
