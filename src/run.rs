//! Verification experiments: one model, one property, two checker invocations.
//!
//! An experiment serializes its model and property to a single file, runs the external
//! checker against it twice — once to check the property (timed), once to gather BDD and
//! reachability statistics — and scrapes both outputs into a [`Report`].
//!
//! The two command-batch files driving the checker are constant across all experiments of a
//! run and written idempotently. The model file itself gets a fresh per-experiment temporary
//! path, so experiments never overwrite each other's model mid-read.

crate::prelude!();

use std::{fs, process::Command, time::Instant};

use model::Model;
use parse::{Extractor, Verdict, MISSING_FLOAT, MISSING_INT};
use props::Property;

/// Default command invoking the checker, resolved through `PATH`.
pub const DEFAULT_CHECKER: &str = "NuSMV";

/// Commands of the property-checking batch.
pub const CHECK_BATCH: &str = "go; check_property; quit;";
/// Commands of the statistics-gathering batch.
pub const STATS_BATCH: &str = "go; print_bdd_stats; print_reachable_states; quit;";

/// File name of the property-checking batch.
const CHECK_BATCH_FILE: &str = "check.smv";
/// File name of the statistics-gathering batch.
const STATS_BATCH_FILE: &str = "stats.smv";

/// Quantitative results of one experiment.
///
/// Fields start at their sentinel and are populated as the corresponding output is parsed; a
/// field still at its sentinel after execution means the checker did not print the metric.
#[derive(Debug, Clone)]
pub struct Report {
    /// Wall-clock time of the check phase, in milliseconds.
    pub time_ms: i64,
    /// Memory used by the checker, in bytes.
    pub memory: i64,
    /// Peak number of BDD nodes.
    pub total_nodes: i64,
    /// Peak number of live BDD nodes.
    pub live_nodes: i64,
    /// Outcome of the property check.
    pub verdict: Verdict,
    /// Counterexample length, zero if the property held.
    pub witness_length: i64,
    /// System diameter.
    pub diameter: i64,
    /// Base-2 logarithm of the number of reachable states.
    pub reachable_states: f64,
    /// Base-2 logarithm of the total number of states.
    pub total_states: f64,
}
impl Default for Report {
    fn default() -> Self {
        Self {
            time_ms: MISSING_INT,
            memory: MISSING_INT,
            total_nodes: MISSING_INT,
            live_nodes: MISSING_INT,
            verdict: Verdict::Unknown,
            witness_length: MISSING_INT,
            diameter: MISSING_INT,
            reachable_states: MISSING_FLOAT,
            total_states: MISSING_FLOAT,
        }
    }
}

/// A verification experiment over one model and one property.
#[derive(Debug)]
pub struct Experiment {
    /// The model under verification, shared with the cache that built it.
    model: Rc<Model>,
    /// The property to verify, rendered against that same model.
    property: Property,
    /// Command invoking the checker.
    checker: PathBuf,
    /// Directory holding the batch files and the temporary model file.
    work_dir: PathBuf,
    /// Compiled output patterns.
    extractor: Extractor,
    /// Results accumulated so far, populated by [`execute`](Self::execute).
    report: Report,
}
impl Experiment {
    /// Constructor; does not run anything yet.
    ///
    /// The checker defaults to [`DEFAULT_CHECKER`] and the working directory to the system
    /// temporary directory.
    pub fn new(model: Rc<Model>, property: Property) -> Res<Self> {
        Ok(Self {
            model,
            property,
            checker: PathBuf::from(DEFAULT_CHECKER),
            work_dir: std::env::temp_dir(),
            extractor: Extractor::new()?,
            report: Report::default(),
        })
    }

    /// Sets the command invoking the checker.
    pub fn with_checker(mut self, checker: impl Into<PathBuf>) -> Self {
        self.checker = checker.into();
        self
    }
    /// Sets the directory holding the batch and model files.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// The model under verification.
    pub fn model(&self) -> &Rc<Model> {
        &self.model
    }
    /// The property under verification.
    pub fn property(&self) -> &Property {
        &self.property
    }
    /// Results gathered so far.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// The complete checker input: model body, blank line, logic keyword, formula body.
    pub fn model_text(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            self.model.text(),
            self.property.logic().keyword(),
            self.property.text()
        )
    }

    /// Path of the property-checking batch file.
    pub fn check_batch_path(&self) -> PathBuf {
        self.work_dir.join(CHECK_BATCH_FILE)
    }
    /// Path of the statistics-gathering batch file.
    pub fn stats_batch_path(&self) -> PathBuf {
        self.work_dir.join(STATS_BATCH_FILE)
    }

    /// True if both batch files exist.
    pub fn prerequisites_ready(&self) -> bool {
        self.check_batch_path().is_file() && self.stats_batch_path().is_file()
    }

    /// Writes the two batch files.
    ///
    /// Their content is constant across all experiments of a run, so re-writing is
    /// idempotent.
    pub fn fulfill_prerequisites(&self) -> Res<()> {
        fs::write(self.check_batch_path(), CHECK_BATCH)
            .chain_err(|| "while writing the check batch file")?;
        fs::write(self.stats_batch_path(), STATS_BATCH)
            .chain_err(|| "while writing the stats batch file")?;
        Ok(())
    }

    /// Runs the experiment: check phase (timed), then stats phase.
    ///
    /// A failing invocation aborts this experiment only; the report keeps whatever was
    /// parsed before the failure.
    pub fn execute(&mut self) -> Res<()> {
        if !self.prerequisites_ready() {
            self.fulfill_prerequisites()?;
        }
        let model_file = tempfile::Builder::new()
            .prefix("model-")
            .suffix(".smv")
            .tempfile_in(&self.work_dir)
            .chain_err(|| "while creating the model file")?;
        fs::write(model_file.path(), self.model_text())
            .chain_err(|| "while writing the model file")?;
        info!(
            "checking `{}` / `{}`",
            self.model.name(),
            self.property.name()
        );

        let start = Instant::now();
        let output = self.run_checker("check", &self.check_batch_path(), model_file.path())?;
        self.report.time_ms = start.elapsed().as_millis() as i64;
        self.parse_check(&output);

        let output = self.run_checker("stats", &self.stats_batch_path(), model_file.path())?;
        self.parse_stats(&output);
        Ok(())
    }

    /// Invokes the checker on a batch file and the model file, capturing its stdout.
    ///
    /// A non-zero exit code or empty output is fatal for the experiment, not retried.
    fn run_checker(&self, phase: &str, batch: &Path, model: &Path) -> Res<String> {
        debug!("running {:?} -source {:?} {:?}", self.checker, batch, model);
        let output = Command::new(&self.checker)
            .arg("-source")
            .arg(batch)
            .arg(model)
            .output()
            .chain_err(|| format!("while spawning checker `{}`", self.checker.display()))?;
        if !output.status.success() {
            bail!(ErrorKind::Checker(phase.into(), output.status.code()))
        }
        let stdout = String::from_utf8(output.stdout)
            .chain_err(|| format!("while decoding {} phase output", phase))?;
        if stdout.is_empty() {
            bail!("checker {} run produced no output", phase)
        }
        Ok(stdout)
    }

    /// Populates verdict and counterexample fields from check-phase output.
    fn parse_check(&mut self, output: &str) {
        self.report.verdict = parse::verdict(output);
        self.report.witness_length = self.extractor.witness_length(output) as i64;
    }

    /// Populates memory, node-count and state-space fields from stats-phase output.
    fn parse_stats(&mut self, output: &str) {
        self.report.memory = self.extractor.memory(output);
        self.report.total_nodes = self.extractor.total_nodes(output);
        self.report.live_nodes = self.extractor.live_nodes(output);
        self.report.diameter = self.extractor.diameter(output);
        self.report.reachable_states = self.extractor.reachable_states(output);
        self.report.total_states = self.extractor.total_states(output);
    }
}

/// Prepares the experiment for a configuration, if one applies.
///
/// Builds (or fetches from cache) the model, renders the property against it and couples the
/// two. Yields `None` for configurations whose pipeline is infeasible.
pub fn prepare(
    library: &mut catalog::Library,
    config: &catalog::Config,
) -> Res<Option<Experiment>> {
    let model = match library.get_or_build(config)? {
        Some(model) => model,
        None => {
            debug!(
                "no experiment: `{}` infeasible for domain size {}",
                config.query.name(),
                config.domain_size
            );
            return Ok(None);
        }
    };
    let property = props::build(config.property, &model);
    Ok(Some(Experiment::new(model, property)?))
}

#[cfg(test)]
mod test;
