use std::fmt::Display;

use crate::basic_types::ConstraintIndex;
use crate::basic_types::StepId;

/// Findings of the compiler which do not prevent a model from being built but which usually
/// explain why it is unsatisfiable or why a constraint has no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// No user may perform the step.
    InfeasibleDomain { step: StepId },
    /// A binding-of-duty constraint over two steps without a user allowed on both.
    NoCommonUser {
        constraint: ConstraintIndex,
        first: StepId,
        second: StepId,
    },
    /// A Wang-Li constraint for which no department covers the scope; it is not enforced.
    InertWangLi { constraint: ConstraintIndex },
}

impl Diagnostic {
    /// Whether the diagnostic proves that the model has no solution.
    pub fn is_conflict(&self) -> bool {
        match self {
            Diagnostic::InfeasibleDomain { .. } | Diagnostic::NoCommonUser { .. } => true,
            Diagnostic::InertWangLi { .. } => false,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::InfeasibleDomain { step } => {
                write!(f, "no user is allowed to perform step {step}")
            }
            Diagnostic::NoCommonUser {
                constraint,
                first,
                second,
            } => write!(
                f,
                "constraint {constraint} binds {first} and {second} but no user may perform both"
            ),
            Diagnostic::InertWangLi { constraint } => write!(
                f,
                "constraint {constraint} is inert because no department covers all of its steps"
            ),
        }
    }
}
