//! Common imports throughout this project.

pub use std::{
    collections::{BTreeMap as Map, BTreeSet as Set},
    fmt,
    io::Write,
    path::{Path, PathBuf},
    rc::Rc,
};

pub use error_chain::bail;
pub use log::{debug, info, trace};

pub use crate::{catalog, graph, model, parse, props, run, smv};

error_chain::error_chain! {
    types {
        Error, ErrorKind, ResExt, Res;
    }

    foreign_links {
        Io(std::io::Error)
        /// I/O error.
        ;
        Regex(regex::Error)
        /// Pattern compilation error.
        ;
        Utf8(std::string::FromUtf8Error)
        /// Checker output that is not valid UTF-8.
        ;
    }

    errors {
        /// The external checker failed.
        ///
        /// Covers both a non-zero exit code and unusable (empty) output. Fatal
        /// for the experiment that owns the invocation, never retried.
        Checker(phase: String, code: Option<i32>) {
            description("checker invocation failed")
            display(
                "NuSMV {} run failed ({})",
                phase,
                code.map(|c| format!("exit code {}", c)).unwrap_or_else(|| "killed by signal".into()),
            )
        }
    }
}
