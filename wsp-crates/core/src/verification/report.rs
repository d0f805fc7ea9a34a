use std::fmt::Display;

use crate::basic_types::format_set;
use crate::basic_types::ConstraintIndex;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::constraints::ConstraintKind;

/// A single reason why an assignment does not satisfy an instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Violation {
    MissingAssignment {
        step: StepId,
    },
    MultipleAssignments {
        step: StepId,
        users: Vec<UserId>,
    },
    StepOutOfRange {
        step: StepId,
        user: UserId,
    },
    UserOutOfRange {
        step: StepId,
        user: UserId,
    },
    /// The constraint references steps which have no unique in-range user.
    UnresolvedSteps {
        steps: Vec<StepId>,
    },
    Unauthorized {
        step: StepId,
        user: UserId,
    },
    SameUser {
        first: StepId,
        second: StepId,
        user: UserId,
    },
    DifferentUsers {
        first: StepId,
        first_user: UserId,
        second: StepId,
        second_user: UserId,
    },
    TooManyUsers {
        users: Vec<UserId>,
        limit: u32,
    },
    NoCommonTeam {
        users: Vec<UserId>,
    },
    MissingSuperUser {
        users: Vec<UserId>,
        threshold: u32,
    },
    DepartmentsMixed {
        users: Vec<UserId>,
    },
    TargetNotAllowed {
        source_step: StepId,
        source_user: UserId,
        target_step: StepId,
        target_user: UserId,
    },
}

impl Violation {
    /// Whether the violation concerns the shape of the assignment rather than a constraint.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Violation::MissingAssignment { .. }
                | Violation::MultipleAssignments { .. }
                | Violation::StepOutOfRange { .. }
                | Violation::UserOutOfRange { .. }
        )
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::MissingAssignment { step } => write!(f, "{step} has no user"),
            Violation::MultipleAssignments { step, users } => {
                write!(f, "{step} is assigned to several users {}", format_set(users))
            }
            Violation::StepOutOfRange { step, user } => {
                write!(f, "{step} (assigned to {user}) is not a step of the instance")
            }
            Violation::UserOutOfRange { step, user } => {
                write!(f, "{step} is assigned to {user}, which is not a user of the instance")
            }
            Violation::UnresolvedSteps { steps } => write!(
                f,
                "the steps {} have no unique user",
                format_set(steps)
            ),
            Violation::Unauthorized { step, user } => {
                write!(f, "{user} is not authorized to perform {step}")
            }
            Violation::SameUser {
                first,
                second,
                user,
            } => write!(f, "{first} and {second} are both performed by {user}"),
            Violation::DifferentUsers {
                first,
                first_user,
                second,
                second_user,
            } => write!(
                f,
                "{first} is performed by {first_user} but {second} by {second_user}"
            ),
            Violation::TooManyUsers { users, limit } => write!(
                f,
                "{} distinct users {} exceed the limit of {limit}",
                users.len(),
                format_set(users)
            ),
            Violation::NoCommonTeam { users } => {
                write!(f, "no single team contains the users {}", format_set(users))
            }
            Violation::MissingSuperUser { users, threshold } => write!(
                f,
                "only {} distinct users {} (threshold {threshold}) and no super-user",
                users.len(),
                format_set(users)
            ),
            Violation::DepartmentsMixed { users } => write!(
                f,
                "the users {} do not belong to one department",
                format_set(users)
            ),
            Violation::TargetNotAllowed {
                source_step,
                source_user,
                target_step,
                target_user,
            } => write!(
                f,
                "{source_step} is performed by {source_user}, so {target_step} may not be \
                 performed by {target_user}"
            ),
        }
    }
}

/// Identifies what a [`ConstraintOutcome`] was checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintReference {
    /// Every step has exactly one user and all identifiers are in range.
    Structure,
    Constraint(ConstraintIndex),
    /// No user without authorization entries is assigned; only checked for the closed-world
    /// policy.
    UnlistedUsers,
}

/// The result of checking one constraint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintOutcome {
    pub reference: ConstraintReference,
    pub kind: Option<ConstraintKind>,
    pub violations: Vec<Violation>,
}

impl ConstraintOutcome {
    pub fn is_satisfied(&self) -> bool {
        self.violations.is_empty()
    }
}

impl Display for ConstraintOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.reference, self.kind) {
            (ConstraintReference::Structure, _) => write!(f, "structure")?,
            (ConstraintReference::UnlistedUsers, _) => write!(f, "unlisted users")?,
            (ConstraintReference::Constraint(index), Some(kind)) => write!(f, "{index} {kind}")?,
            (ConstraintReference::Constraint(index), None) => write!(f, "{index}")?,
        }

        if self.is_satisfied() {
            return write!(f, ": ok");
        }

        write!(f, ": violated")?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

/// The outcome of checking an assignment against every active constraint of an instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VerificationReport {
    outcomes: Vec<ConstraintOutcome>,
}

impl VerificationReport {
    pub(crate) fn new(outcomes: Vec<ConstraintOutcome>) -> VerificationReport {
        VerificationReport { outcomes }
    }

    /// The outcomes, starting with the structural check, followed by the constraints in instance
    /// order.
    pub fn outcomes(&self) -> &[ConstraintOutcome] {
        &self.outcomes
    }

    pub fn all_satisfied(&self) -> bool {
        self.outcomes.iter().all(ConstraintOutcome::is_satisfied)
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> + '_ {
        self.outcomes
            .iter()
            .flat_map(|outcome| outcome.violations.iter())
    }

    pub fn num_violated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_satisfied())
            .count()
    }

    /// The outcome of the constraint at `index`, if it was checked.
    pub fn outcome_of(&self, index: ConstraintIndex) -> Option<&ConstraintOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.reference == ConstraintReference::Constraint(index))
    }
}

impl Display for VerificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
        }
        if self.all_satisfied() {
            write!(f, "all {} checks satisfied", self.outcomes.len())
        } else {
            write!(
                f,
                "{} of {} checks violated",
                self.num_violated(),
                self.outcomes.len()
            )
        }
    }
}
