//! Tests over formula rendering.

crate::prelude!();

use model::QueueVar;
use props::{Equivalence, Logic, Prop};

fn ids(ids: &[usize]) -> Set<usize> {
    ids.iter().copied().collect()
}

#[test]
fn no_full_queues_trivial() {
    let empty = Set::new();
    assert_eq!(props::no_full_queues(&empty), "TRUE");
}

#[test]
fn no_full_queues_two_flags() {
    let vars: Set<_> = [QueueVar::new("qb0", 3), QueueVar::new("qb1", 3)]
        .into_iter()
        .collect();
    assert_eq!(props::no_full_queues(&vars), "! (EF (qb0[2] | qb1[2]));");
}

#[test]
fn no_full_queues_qualified_names() {
    let vars: Set<_> = [QueueVar::new("p3.qb_0", 2)].into_iter().collect();
    assert_eq!(props::no_full_queues(&vars), "! (EF (p3.qb_0[1]));");
}

#[test]
fn liveness_single_port() {
    assert_eq!(
        props::liveness(&ids(&[0]), &ids(&[0])),
        "G ((inb_0[0]) -> (F (ob_0[0])));"
    );
}

#[test]
fn liveness_many_ports() {
    assert_eq!(
        props::liveness(&ids(&[1, 0]), &ids(&[1, 0])),
        "G ((inb_0[0] & inb_1[0]) -> (F (ob_0[0]))) & G ((inb_0[0] & inb_1[0]) -> (F (ob_1[0])));"
    );
}

#[test]
fn bounded_liveness_single_port() {
    assert_eq!(
        props::bounded_liveness(&ids(&[0]), &ids(&[0])),
        "G ((inb_0[0]) -> (ob_0[0] | X (ob_0[0] | X ob_0[0])));"
    );
}

#[test]
fn output_always_even_single_port() {
    assert_eq!(
        props::output_always_even(&ids(&[0])),
        "AG (ob_0[0] -> ((oc_0 mod 2) = 0));"
    );
}

#[test]
fn output_always_true_single_port() {
    assert_eq!(props::output_always_true(&ids(&[0])), "G (ob_0[0] -> oc_0);");
}

#[test]
fn stepwise_trivial_below_two_outputs() {
    assert_eq!(props::stepwise_equivalence(&ids(&[])), "TRUE");
    assert_eq!(props::stepwise_equivalence(&ids(&[0])), "TRUE");
}

#[test]
fn stepwise_pair() {
    assert_eq!(
        props::stepwise_equivalence(&ids(&[0, 1])),
        "G ((ob_0[0] = ob_1[0]) & (ob_0[0] -> (oc_0 = oc_1)));"
    );
}

#[test]
fn stepwise_all_unordered_pairs() {
    let rendered = props::stepwise_equivalence(&ids(&[0, 1, 2]));
    assert_eq!(rendered.matches("G (").count(), 3);
    assert!(rendered.contains("oc_0 = oc_1"));
    assert!(rendered.contains("oc_0 = oc_2"));
    assert!(rendered.contains("oc_1 = oc_2"));
}

#[test]
fn logic_kinds() {
    assert_eq!(Prop::NoFullQueues.logic(), Logic::Ctl);
    assert_eq!(Prop::OutputAlwaysEven.logic(), Logic::Ctl);
    assert_eq!(Prop::Liveness.logic(), Logic::Ltl);
    assert_eq!(Prop::BoundedLiveness.logic(), Logic::Ltl);
    assert_eq!(Prop::StepwiseEquivalence.logic(), Logic::Ltl);
    assert_eq!(Logic::Ctl.keyword(), "CTLSPEC");
    assert_eq!(Logic::Ltl.keyword(), "LTLSPEC");
}

#[test]
fn equivalence_flavors() {
    assert_eq!(
        Prop::StepwiseEquivalence.equivalence(),
        Some(Equivalence::Stepwise)
    );
    assert_eq!(
        Prop::SequenceEquivalence.equivalence(),
        Some(Equivalence::Sequence)
    );
    assert_eq!(Prop::Liveness.equivalence(), None);
}

#[test]
fn names_round_trip() {
    for prop in Prop::ALL {
        assert_eq!(Prop::from_name(prop.name()), Some(prop));
    }
    assert_eq!(Prop::from_name("No such property"), None);
}
