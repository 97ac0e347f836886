//! Stateless extraction of typed results from the checker's textual output.
//!
//! NuSMV's output format is not guaranteed stable across metrics and configurations (the
//! system diameter does not print for disproved properties, for instance), so every
//! extraction is applied independently and a miss yields a sentinel value, never an error.

crate::prelude!();

use regex::Regex;

/// Sentinel for an integer metric absent from the output.
pub const MISSING_INT: i64 = -1;
/// Sentinel for a floating-point metric absent from the output.
pub const MISSING_FLOAT: f64 = -1.0;

/// Outcome of a property check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The property holds.
    True,
    /// The property is disproved; a counterexample trace follows in the output.
    False,
    /// The output names no verdict.
    Unknown,
}
impl fmt::Display for Verdict {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::True => write!(fmt, "True"),
            Self::False => write!(fmt, "False"),
            Self::Unknown => write!(fmt, "Unknown"),
        }
    }
}

/// Scans checker output for the verdict substrings.
///
/// A `is false` marker takes precedence over `is true`; in practice the two are mutually
/// exclusive per run.
pub fn verdict(output: &str) -> Verdict {
    if output.contains("is false") {
        Verdict::False
    } else if output.contains("is true") {
        Verdict::True
    } else {
        Verdict::Unknown
    }
}

/// Extracts the first capture of a pattern as an integer, [`MISSING_INT`] on a miss.
pub fn extract_int(output: &str, pattern: &Regex) -> i64 {
    match pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|num| num.as_str().parse().ok())
    {
        Some(num) => num,
        None => {
            trace!("no match for `{}` in checker output", pattern);
            MISSING_INT
        }
    }
}

/// Extracts the first capture of a pattern as a float, [`MISSING_FLOAT`] on a miss.
pub fn extract_float(output: &str, pattern: &Regex) -> f64 {
    match pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|num| num.as_str().parse().ok())
    {
        Some(num) => num,
        None => {
            trace!("no match for `{}` in checker output", pattern);
            MISSING_FLOAT
        }
    }
}

/// The compiled extraction patterns, one per metric.
#[derive(Debug)]
pub struct Extractor {
    /// `Memory in use: <bytes>`.
    memory: Regex,
    /// `Peak number of nodes: <count>`.
    total_nodes: Regex,
    /// `Peak number of live nodes: <count>`.
    live_nodes: Regex,
    /// `system diameter: <steps>`.
    diameter: Regex,
    /// `reachable states: ...^<exponent>`.
    reachable_states: Regex,
    /// `out of ...^<exponent>`.
    total_states: Regex,
    /// `State: <trace>.<index>`, one per counterexample state.
    witness: Regex,
}
impl Extractor {
    /// Compiles the extraction patterns.
    pub fn new() -> Res<Self> {
        Ok(Self {
            memory: Regex::new(r"Memory in use: (\d+)")?,
            total_nodes: Regex::new(r"Peak number of nodes: (\d+)")?,
            live_nodes: Regex::new(r"Peak number of live nodes: (\d+)")?,
            diameter: Regex::new(r"system diameter: (\d+)")?,
            reachable_states: Regex::new(r"reachable states: .*?\^([\d\.]+)")?,
            total_states: Regex::new(r"out of .*?\^([\d\.]+)")?,
            witness: Regex::new(r"State: (\d+)\.(\d+)")?,
        })
    }

    /// Memory used by the checker, in bytes.
    pub fn memory(&self, output: &str) -> i64 {
        extract_int(output, &self.memory)
    }
    /// Peak number of BDD nodes.
    pub fn total_nodes(&self, output: &str) -> i64 {
        extract_int(output, &self.total_nodes)
    }
    /// Peak number of live BDD nodes.
    pub fn live_nodes(&self, output: &str) -> i64 {
        extract_int(output, &self.live_nodes)
    }
    /// System diameter.
    pub fn diameter(&self, output: &str) -> i64 {
        extract_int(output, &self.diameter)
    }
    /// Base-2 logarithm of the number of reachable states.
    pub fn reachable_states(&self, output: &str) -> f64 {
        extract_float(output, &self.reachable_states)
    }
    /// Base-2 logarithm of the total number of states.
    pub fn total_states(&self, output: &str) -> f64 {
        extract_float(output, &self.total_states)
    }
    /// Counterexample length: the number of state markers in the output, zero if the property
    /// held.
    pub fn witness_length(&self, output: &str) -> usize {
        self.witness.find_iter(output).count()
    }
}
