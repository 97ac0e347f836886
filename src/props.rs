//! The fixed catalog of temporal properties.
//!
//! A property is rendered at construction time from the port and queue facts exposed by a
//! [`Model`], never from the pipeline graph itself; formula text is therefore decoupled from
//! graph topology. Rendering iterates id sets in ascending order and joins clauses with `&`,
//! so a given model always yields the same formula text.

crate::prelude!();

use model::{Model, QueueVar};

/// The two temporal-formula dialects accepted by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    /// Computation Tree Logic.
    Ctl,
    /// Linear Temporal Logic.
    Ltl,
}
impl Logic {
    /// The keyword introducing a specification of this logic in a model file.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ctl => "CTLSPEC",
            Self::Ltl => "LTLSPEC",
        }
    }
}

/// The two behavioral-equivalence flavors.
///
/// Requesting either doubles the pipeline under verification, see
/// [`catalog`](crate::catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    /// Branch outputs compared step by step.
    Stepwise,
    /// Whole output sequences compared through an equality node.
    Sequence,
}

/// The benchmark properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prop {
    /// No bounded queue ever fills up.
    NoFullQueues,
    /// Whenever all input queues are non-empty, every output eventually fires.
    Liveness,
    /// Liveness with the response bounded to two steps.
    BoundedLiveness,
    /// Every value fired on an output is even.
    OutputAlwaysEven,
    /// Every value fired on an output is true.
    OutputAlwaysTrue,
    /// Both branch outputs fire together and carry equal values.
    StepwiseEquivalence,
    /// The equality output of a doubled pipeline always fires true.
    SequenceEquivalence,
}
impl Prop {
    /// All properties of the catalog.
    pub const ALL: [Prop; 7] = [
        Self::NoFullQueues,
        Self::Liveness,
        Self::BoundedLiveness,
        Self::OutputAlwaysEven,
        Self::OutputAlwaysTrue,
        Self::StepwiseEquivalence,
        Self::SequenceEquivalence,
    ];

    /// Benchmark name of the property.
    pub fn name(self) -> &'static str {
        match self {
            Self::NoFullQueues => "No full queues",
            Self::Liveness => "Liveness",
            Self::BoundedLiveness => "Bounded liveness",
            Self::OutputAlwaysEven => "Output always even",
            Self::OutputAlwaysTrue => "Output always true",
            Self::StepwiseEquivalence => "Step-wise equivalence",
            Self::SequenceEquivalence => "Sequence equivalence",
        }
    }

    /// Property from its benchmark name, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|prop| prop.name() == name)
    }

    /// The logic the property's formula is written in.
    pub fn logic(self) -> Logic {
        match self {
            Self::NoFullQueues | Self::OutputAlwaysEven => Logic::Ctl,
            _ => Logic::Ltl,
        }
    }

    /// The equivalence flavor, for the two behavioral-equivalence properties.
    pub fn equivalence(self) -> Option<Equivalence> {
        match self {
            Self::StepwiseEquivalence => Some(Equivalence::Stepwise),
            Self::SequenceEquivalence => Some(Equivalence::Sequence),
            _ => None,
        }
    }
}

/// A property formula, rendered for one particular model.
#[derive(Debug, Clone)]
pub struct Property {
    /// Which catalog property this is.
    prop: Prop,
    /// Rendered formula body.
    text: String,
}
impl Property {
    /// Which catalog property this is.
    pub fn prop(&self) -> Prop {
        self.prop
    }
    /// Benchmark name of the property.
    pub fn name(&self) -> &'static str {
        self.prop.name()
    }
    /// The logic of the formula.
    pub fn logic(&self) -> Logic {
        self.prop.logic()
    }
    /// Rendered formula body.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Renders a property against the facts of a model.
pub fn build(prop: Prop, model: &Model) -> Property {
    let text = match prop {
        Prop::NoFullQueues => no_full_queues(&model.queue_variables()),
        Prop::Liveness => liveness(&model.input_port_ids(), &model.output_port_ids()),
        Prop::BoundedLiveness => {
            bounded_liveness(&model.input_port_ids(), &model.output_port_ids())
        }
        Prop::OutputAlwaysEven => output_always_even(&model.output_port_ids()),
        Prop::OutputAlwaysTrue | Prop::SequenceEquivalence => {
            output_always_true(&model.output_port_ids())
        }
        Prop::StepwiseEquivalence => stepwise_equivalence(&model.output_port_ids()),
    };
    Property { prop, text }
}

/// It is never reachable that any queue-full flag is true.
///
/// `TRUE` when the model has no bounded queues at all.
pub fn no_full_queues(queue_vars: &Set<QueueVar>) -> String {
    if queue_vars.is_empty() {
        return "TRUE".into();
    }
    let flags = queue_vars
        .iter()
        .map(QueueVar::full_flag)
        .collect::<Vec<_>>()
        .join(" | ");
    format!("! (EF ({}));", flags)
}

/// Whenever all input queues are non-empty, every output eventually fires.
pub fn liveness(inputs: &Set<usize>, outputs: &Set<usize>) -> String {
    if inputs.is_empty() || outputs.is_empty() {
        return "TRUE".into();
    }
    let antecedent = inputs_nonempty(inputs);
    join_clauses(
        outputs
            .iter()
            .map(|o| format!("G (({}) -> (F (ob_{}[0])))", antecedent, o)),
    )
}

/// Liveness with the response bounded to within two steps.
pub fn bounded_liveness(inputs: &Set<usize>, outputs: &Set<usize>) -> String {
    if inputs.is_empty() || outputs.is_empty() {
        return "TRUE".into();
    }
    let antecedent = inputs_nonempty(inputs);
    join_clauses(outputs.iter().map(|o| {
        format!(
            "G (({}) -> (ob_{}[0] | X (ob_{}[0] | X ob_{}[0])))",
            antecedent, o, o, o
        )
    }))
}

/// Every value fired on an output is even.
pub fn output_always_even(outputs: &Set<usize>) -> String {
    if outputs.is_empty() {
        return "TRUE".into();
    }
    join_clauses(
        outputs
            .iter()
            .map(|o| format!("AG (ob_{}[0] -> ((oc_{} mod 2) = 0))", o, o)),
    )
}

/// Every value fired on an output is true.
///
/// Also the rendering of whole-sequence equivalence, where the single output is the boolean
/// produced by the equality node of a doubled pipeline.
pub fn output_always_true(outputs: &Set<usize>) -> String {
    if outputs.is_empty() {
        return "TRUE".into();
    }
    join_clauses(
        outputs
            .iter()
            .map(|o| format!("G (ob_{}[0] -> oc_{})", o, o)),
    )
}

/// For every pair of distinct outputs: both fire together, and fired values are equal.
///
/// `TRUE` when the model exposes fewer than two outputs.
pub fn stepwise_equivalence(outputs: &Set<usize>) -> String {
    let outputs: Vec<_> = outputs.iter().collect();
    if outputs.len() < 2 {
        return "TRUE".into();
    }
    let mut clauses = vec![];
    for (idx, lft) in outputs.iter().enumerate() {
        for rgt in &outputs[idx + 1..] {
            clauses.push(format!(
                "G ((ob_{}[0] = ob_{}[0]) & (ob_{}[0] -> (oc_{} = oc_{})))",
                lft, rgt, lft, lft, rgt
            ));
        }
    }
    join_clauses(clauses.into_iter())
}

/// Conjunction of the input-queue-nonempty flags.
fn inputs_nonempty(inputs: &Set<usize>) -> String {
    inputs
        .iter()
        .map(|i| format!("inb_{}[0]", i))
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Joins rendered clauses with `&` and terminates the statement.
fn join_clauses(clauses: impl Iterator<Item = String>) -> String {
    let mut text = clauses.collect::<Vec<_>>().join(" & ");
    text.push(';');
    text
}

#[cfg(test)]
mod test;
