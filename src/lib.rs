//! Benchmark core for verifying temporal properties of stream-processing pipelines with NuSMV.
//!
//! For a benchmark *configuration* — a pipeline shape, a finite value domain, a bounded queue
//! capacity, an optional shape parameter and a temporal property — this crate
//!
//! - deterministically constructs a finite-state model of the pipeline ([`catalog`], [`graph`]),
//! - compiles it to NuSMV model text and introspects the generated variables ([`smv`],
//!   [`model`]),
//! - generates the CTL or LTL formula to verify against that model ([`props`]), and
//! - drives the external `NuSMV` process and scrapes quantitative results from its output
//!   ([`run`], [`parse`]).
//!
//! The set of constructible pipelines is a fixed catalog; the model checker itself is an
//! external binary invoked by path.

#![forbid(missing_docs)]

mod macros;

pub mod prelude;

pub mod catalog;
pub mod graph;
pub mod model;
pub mod parse;
pub mod props;
pub mod run;
pub mod smv;
