//! Tests over experiment setup.
//!
//! These exercise everything up to (but not including) the actual checker invocation, which
//! needs a NuSMV binary.

crate::prelude!();

use catalog::{Config, Library, Query};
use parse::{Verdict, MISSING_FLOAT, MISSING_INT};
use props::Prop;
use run::{Experiment, Report, CHECK_BATCH, STATS_BATCH};

use std::fs;

fn config(query: Query, property: Prop) -> Config {
    Config {
        query,
        domain_size: 3,
        queue_size: 2,
        param: None,
        property,
    }
}

fn experiment_in(dir: &Path, property: Prop) -> Experiment {
    let mut library = Library::new();
    run::prepare(&mut library, &config(Query::Passthrough, property))
        .unwrap()
        .expect("feasible configuration")
        .with_work_dir(dir)
}

#[test_log::test]
fn batch_files_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let experiment = experiment_in(dir.path(), Prop::NoFullQueues);

    assert!(!experiment.prerequisites_ready());
    experiment.fulfill_prerequisites().unwrap();
    assert!(experiment.prerequisites_ready());

    let check_once = fs::read_to_string(experiment.check_batch_path()).unwrap();
    let stats_once = fs::read_to_string(experiment.stats_batch_path()).unwrap();
    assert_eq!(check_once, CHECK_BATCH);
    assert_eq!(stats_once, STATS_BATCH);

    // Writing again leaves the files byte-identical.
    experiment.fulfill_prerequisites().unwrap();
    assert_eq!(
        fs::read_to_string(experiment.check_batch_path()).unwrap(),
        check_once
    );
    assert_eq!(
        fs::read_to_string(experiment.stats_batch_path()).unwrap(),
        stats_once
    );
}

#[test]
fn model_text_layout() {
    let dir = tempfile::tempdir().unwrap();

    let ctl = experiment_in(dir.path(), Prop::NoFullQueues);
    let text = ctl.model_text();
    assert!(text.starts_with("MODULE "));
    assert!(text.contains("\nCTLSPEC\n"));
    assert!(text.ends_with(&format!("{}\n", ctl.property().text())));

    let ltl = experiment_in(dir.path(), Prop::Liveness);
    let text = ltl.model_text();
    assert!(text.contains("\nLTLSPEC\n"));
    assert!(!text.contains("CTLSPEC"));
    assert!(text.ends_with(&format!("{}\n", ltl.property().text())));
}

#[test]
fn report_starts_at_sentinels() {
    let report = Report::default();
    assert_eq!(report.time_ms, MISSING_INT);
    assert_eq!(report.memory, MISSING_INT);
    assert_eq!(report.total_nodes, MISSING_INT);
    assert_eq!(report.live_nodes, MISSING_INT);
    assert_eq!(report.verdict, Verdict::Unknown);
    assert_eq!(report.witness_length, MISSING_INT);
    assert_eq!(report.diameter, MISSING_INT);
    assert_eq!(report.reachable_states, MISSING_FLOAT);
    assert_eq!(report.total_states, MISSING_FLOAT);
}

#[test]
fn prepare_skips_infeasible_configurations() {
    let mut library = Library::new();
    let conf = Config {
        domain_size: 2,
        ..config(Query::SumOfDoubles, Prop::NoFullQueues)
    };
    assert!(run::prepare(&mut library, &conf).unwrap().is_none());
}

#[test]
fn prepare_couples_model_and_property() {
    let mut library = Library::new();
    let experiment = run::prepare(&mut library, &config(Query::Passthrough, Prop::Liveness))
        .unwrap()
        .unwrap();
    assert_eq!(experiment.model().name(), Query::Passthrough.name());
    assert_eq!(
        experiment.property().text(),
        "G ((inb_0[0]) -> (F (ob_0[0])));"
    );
}
