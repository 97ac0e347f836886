//! Tests over model introspection.

crate::prelude!();

use catalog::{Config, Library, Query};
use model::Model;
use props::Prop;

fn passthrough_config() -> Config {
    Config {
        query: Query::Passthrough,
        domain_size: 3,
        queue_size: 2,
        param: None,
        property: Prop::NoFullQueues,
    }
}

fn build(config: &Config) -> Rc<Model> {
    Library::new()
        .get_or_build(config)
        .unwrap()
        .expect("feasible configuration")
}

#[test]
fn passthrough_end_to_end() {
    let model = build(&passthrough_config());

    let inputs = model.input_port_ids();
    assert_eq!(inputs.len(), 1);
    assert!(inputs.contains(&0));
    let outputs = model.output_port_ids();
    assert_eq!(outputs.len(), 1);
    assert!(outputs.contains(&0));

    let text = model.text();
    assert!(text.contains("MODULE main"));
    assert!(text.contains("inc_0 : 0..2;"));
    assert!(text.contains("oc_0 : 0..2;"));
    assert!(!text.contains("inc_1"));
    assert!(!text.contains("oc_1"));

    let queues = model.queue_variables();
    assert_eq!(queues.len(), 1);
    let queue = queues.iter().next().unwrap();
    assert!(queue.name.ends_with(".qb_0"));
    assert_eq!(queue.size, 2);
    assert!(queue.full_flag().ends_with(".qb_0[1]"));

    let property = props::build(Prop::NoFullQueues, &model);
    assert_eq!(property.text(), props::no_full_queues(&queues));
    assert_eq!(property.text(), format!("! (EF ({}));", queue.full_flag()));
}

#[test]
fn passthrough_variable_count() {
    let model = build(&passthrough_config());
    // Main declares `inc_0`, `inb_0`, the node instance, `oc_0` and `ob_0`; the instance
    // contributes its own `qc_0` and `qb_0`.
    assert_eq!(model.variable_count(), 7);
}

#[test]
fn passthrough_module_count() {
    let model = build(&passthrough_config());
    // One node module plus `main`.
    assert_eq!(model.module_count(), 2);
}

#[test]
fn nested_queues_are_qualified() {
    let config = Config {
        query: Query::CompareWindowSum3,
        ..passthrough_config()
    };
    let model = build(&config);
    let queues = model.queue_variables();
    // Group and window nodes nest instances, so some queue paths go several modules deep.
    assert!(queues.iter().any(|var| var.name.matches('.').count() >= 2));
    // Every path is rooted at a `main` instance.
    assert!(queues.iter().all(|var| var.name.starts_with('p')));
}

#[test]
fn model_records_configuration() {
    let model = build(&passthrough_config());
    assert_eq!(model.name(), Query::Passthrough.name());
    assert_eq!(model.domain_size(), 3);
    assert_eq!(model.queue_size(), 2);
    assert_eq!(model.param(), None);
}
