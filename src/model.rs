//! Model providers: a compiled pipeline plus introspection over its generated variables.

crate::prelude!();

use smv::{Compiled, SmvModule, SmvType};

/// A bounded-queue occupancy variable of the generated model.
///
/// The queue is full exactly when the last index of the array is true.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueueVar {
    /// Qualified variable name (dotted path from `main`).
    pub name: String,
    /// Array width, equal to the queue capacity.
    pub size: usize,
}
impl QueueVar {
    /// Constructor.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
    /// The queue-full flag: the last slot of the array.
    pub fn full_flag(&self) -> String {
        format!("{}[{}]", self.name, self.size - 1)
    }
}

/// A NuSMV model for one benchmark configuration.
///
/// Owns the compiled text and the module table it was generated from; immutable once built.
/// Created once per configuration by the [`catalog`](crate::catalog) and shared behind an
/// [`Rc`] so that every experiment for that configuration sees the exact same variable names.
#[derive(Debug)]
pub struct Model {
    /// Query name.
    name: String,
    /// Queue capacity the model was generated with.
    queue_size: usize,
    /// Domain cardinality the model was generated with.
    domain_size: usize,
    /// Effective shape parameter used during construction, for queries that have one.
    param: Option<usize>,
    /// Compilation result.
    compiled: Compiled,
    /// Time taken to build and compile the pipeline, in milliseconds.
    generation_ms: u64,
}
impl Model {
    /// Constructor.
    pub fn new(
        name: impl Into<String>,
        queue_size: usize,
        domain_size: usize,
        param: Option<usize>,
        compiled: Compiled,
        generation_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            queue_size,
            domain_size,
            param,
            compiled,
            generation_ms,
        }
    }

    /// Query name.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Queue capacity.
    pub fn queue_size(&self) -> usize {
        self.queue_size
    }
    /// Domain cardinality.
    pub fn domain_size(&self) -> usize {
        self.domain_size
    }
    /// Effective shape parameter, if the query has one.
    pub fn param(&self) -> Option<usize> {
        self.param
    }
    /// Serialized model text.
    pub fn text(&self) -> &str {
        self.compiled.text()
    }
    /// Time taken to build and compile the pipeline, in milliseconds.
    pub fn generation_ms(&self) -> u64 {
        self.generation_ms
    }
    /// Number of generated top-level modules, `main` included.
    pub fn module_count(&self) -> usize {
        self.compiled.modules().len() + 1
    }

    /// Counts the variables of the model, recursing through nested modules.
    ///
    /// Each variable is counted once per (qualified name, type) pair, so a module instance
    /// reachable through several paths contributes its variables once per path but shared
    /// declarations are not double-counted.
    pub fn variable_count(&self) -> usize {
        let mut seen: Set<(String, String)> = Set::new();
        fetch_all_variables(self.compiled.main(), "", &mut seen);
        seen.len()
    }

    /// All bounded-queue occupancy variables of the model, under their qualified names.
    pub fn queue_variables(&self) -> Set<QueueVar> {
        let mut vars = Set::new();
        fetch_queue_variables(self.compiled.main(), "", &mut vars);
        vars
    }

    /// Ids of the external input ports, discovered by scanning `main` for the input naming
    /// convention.
    pub fn input_port_ids(&self) -> Set<usize> {
        scan_port_ids(self.compiled.main(), smv::INPUT_PREFIX)
    }
    /// Ids of the external output ports, discovered by scanning `main` for the output naming
    /// convention.
    pub fn output_port_ids(&self) -> Set<usize> {
        scan_port_ids(self.compiled.main(), smv::OUTPUT_PREFIX)
    }
}

/// Recursively collects all (qualified name, type descriptor) pairs of a module hierarchy.
fn fetch_all_variables(module: &SmvModule, prefix: &str, vars: &mut Set<(String, String)>) {
    for var in &module.vars {
        let qualified = format!("{}{}", prefix, var.name);
        if let Some(nested) = var.typ.instance() {
            let nested_prefix = format!("{}.", qualified);
            vars.insert((qualified, nested.name.clone()));
            fetch_all_variables(nested, &nested_prefix, vars);
        } else {
            vars.insert((qualified, var.typ.to_string()));
        }
    }
}

/// Recursively collects the queue occupancy variables of a module hierarchy.
fn fetch_queue_variables(module: &SmvModule, prefix: &str, vars: &mut Set<QueueVar>) {
    for var in &module.vars {
        if var.name.starts_with(smv::QUEUE_PREFIX) {
            if let SmvType::BoolArray(size) = var.typ {
                vars.insert(QueueVar::new(format!("{}{}", prefix, var.name), size));
            }
        }
        if let Some(nested) = var.typ.instance() {
            let nested_prefix = format!("{}{}.", prefix, var.name);
            fetch_queue_variables(nested, &nested_prefix, vars);
        }
    }
}

/// Scans the top-level variables of a module for a port naming convention, parsing the
/// trailing numeral as the port id.
fn scan_port_ids(module: &SmvModule, prefix: &str) -> Set<usize> {
    module
        .vars
        .iter()
        .filter_map(|var| var.name.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse().ok())
        .collect()
}

#[cfg(test)]
mod test;
