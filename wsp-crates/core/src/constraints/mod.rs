//! The closed catalog of workflow constraints.
//!
//! Every constraint knows how to encode itself into an
//! [`EncodingModel`](crate::encoding::EncodingModel) for each [`EncodingMode`] and how to check
//! itself against a resolved assignment. Dispatch over the variants happens in [`Constraint`].
mod assignment_dependent;
mod at_most_k;
mod authorization;
mod binding_of_duty;
mod groups;
mod one_team;
mod separation_of_duty;
mod super_user_at_least;
mod wang_li;

use std::fmt::Display;

pub use assignment_dependent::*;
pub use at_most_k::*;
pub use authorization::*;
pub use binding_of_duty::*;
use enum_map::Enum;
use enumset::EnumSet;
use enumset::EnumSetType;
pub use one_team::*;
pub use separation_of_duty::*;
pub use super_user_at_least::*;
pub use wang_li::*;

use crate::basic_types::ConstraintIndex;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::encoding::EncodingMode;
use crate::instance::MalformedInstance;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// The kind of a [`Constraint`]. Sets of kinds select which constraints are active.
#[derive(EnumSetType, Enum, Debug, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ConstraintKind {
    Authorization,
    SeparationOfDuty,
    BindingOfDuty,
    AtMostK,
    OneTeam,
    SuperUserAtLeast,
    WangLi,
    AssignmentDependent,
}

impl ConstraintKind {
    /// All kinds; the default selection of active constraints.
    pub fn all() -> EnumSet<ConstraintKind> {
        EnumSet::all()
    }

    /// Whether constraints of this kind can be encoded in `mode`.
    pub fn supported_in(self, mode: EncodingMode) -> bool {
        !matches!(
            (self, mode),
            (
                ConstraintKind::SuperUserAtLeast,
                EncodingMode::ConstraintSatisfaction
            )
        )
    }

    /// The keyword introducing constraints of this kind in an instance file.
    pub fn keyword(self) -> &'static str {
        match self {
            ConstraintKind::Authorization => "Authorisations",
            ConstraintKind::SeparationOfDuty => "Separation-of-duty",
            ConstraintKind::BindingOfDuty => "Binding-of-duty",
            ConstraintKind::AtMostK => "At-most-k",
            ConstraintKind::OneTeam => "One-team",
            ConstraintKind::SuperUserAtLeast => "Super-user-at-least",
            ConstraintKind::WangLi => "Wang-li",
            ConstraintKind::AssignmentDependent => "Assignment-dependent",
        }
    }
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConstraintKind::Authorization => "authorization",
            ConstraintKind::SeparationOfDuty => "separation-of-duty",
            ConstraintKind::BindingOfDuty => "binding-of-duty",
            ConstraintKind::AtMostK => "at-most-k",
            ConstraintKind::OneTeam => "one-team",
            ConstraintKind::SuperUserAtLeast => "super-user-at-least",
            ConstraintKind::WangLi => "wang-li",
            ConstraintKind::AssignmentDependent => "assignment-dependent",
        };
        write!(f, "{name}")
    }
}

/// A workflow constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Authorization(Authorization),
    SeparationOfDuty(SeparationOfDuty),
    BindingOfDuty(BindingOfDuty),
    AtMostK(AtMostK),
    OneTeam(OneTeam),
    SuperUserAtLeast(SuperUserAtLeast),
    WangLi(WangLi),
    AssignmentDependent(AssignmentDependent),
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Authorization(_) => ConstraintKind::Authorization,
            Constraint::SeparationOfDuty(_) => ConstraintKind::SeparationOfDuty,
            Constraint::BindingOfDuty(_) => ConstraintKind::BindingOfDuty,
            Constraint::AtMostK(_) => ConstraintKind::AtMostK,
            Constraint::OneTeam(_) => ConstraintKind::OneTeam,
            Constraint::SuperUserAtLeast(_) => ConstraintKind::SuperUserAtLeast,
            Constraint::WangLi(_) => ConstraintKind::WangLi,
            Constraint::AssignmentDependent(_) => ConstraintKind::AssignmentDependent,
        }
    }

    /// The steps referenced by this constraint, in order of appearance.
    pub fn steps(&self) -> Vec<StepId> {
        match self {
            Constraint::Authorization(authorization) => authorization.steps.clone(),
            Constraint::SeparationOfDuty(constraint) => vec![constraint.first, constraint.second],
            Constraint::BindingOfDuty(constraint) => vec![constraint.first, constraint.second],
            Constraint::AtMostK(constraint) => constraint.steps.clone(),
            Constraint::OneTeam(constraint) => constraint.steps.clone(),
            Constraint::SuperUserAtLeast(constraint) => constraint.steps.clone(),
            Constraint::WangLi(constraint) => constraint.steps.clone(),
            Constraint::AssignmentDependent(constraint) => {
                vec![constraint.source_step, constraint.target_step]
            }
        }
    }

    /// The users referenced by this constraint, in order of appearance.
    pub fn users(&self) -> Vec<UserId> {
        match self {
            Constraint::Authorization(authorization) => vec![authorization.user],
            Constraint::SeparationOfDuty(_)
            | Constraint::BindingOfDuty(_)
            | Constraint::AtMostK(_) => vec![],
            Constraint::OneTeam(constraint) => constraint.teams.concat(),
            Constraint::SuperUserAtLeast(constraint) => constraint.super_users.clone(),
            Constraint::WangLi(constraint) => constraint.departments.concat(),
            Constraint::AssignmentDependent(constraint) => constraint
                .source_users
                .iter()
                .chain(constraint.target_users.iter())
                .copied()
                .collect(),
        }
    }

    /// Checks that the constraint only references declared steps and users and that its
    /// parameters are not degenerate.
    pub(crate) fn validate(
        &self,
        index: ConstraintIndex,
        num_steps: u32,
        num_users: u32,
    ) -> Result<(), MalformedInstance> {
        if let Some(&step) = self
            .steps()
            .iter()
            .find(|step| step.id() == 0 || step.id() > num_steps)
        {
            return Err(MalformedInstance::UndeclaredStep {
                constraint: index,
                step,
            });
        }

        if let Some(&user) = self
            .users()
            .iter()
            .find(|user| user.id() == 0 || user.id() > num_users)
        {
            return Err(MalformedInstance::UndeclaredUser {
                constraint: index,
                user,
            });
        }

        let (scope, groups) = match self {
            Constraint::Authorization(_)
            | Constraint::SeparationOfDuty(_)
            | Constraint::BindingOfDuty(_)
            | Constraint::AssignmentDependent(_) => return Ok(()),
            Constraint::AtMostK(constraint) => {
                if constraint.limit == 0 {
                    return Err(MalformedInstance::ZeroLimit { constraint: index });
                }
                (&constraint.steps, None)
            }
            Constraint::SuperUserAtLeast(constraint) => (&constraint.steps, None),
            Constraint::OneTeam(constraint) => (&constraint.steps, Some(&constraint.teams)),
            Constraint::WangLi(constraint) => (&constraint.steps, Some(&constraint.departments)),
        };

        if scope.is_empty() {
            return Err(MalformedInstance::EmptyScope { constraint: index });
        }

        if let Some(groups) = groups {
            if groups.is_empty() {
                return Err(MalformedInstance::NoGroups { constraint: index });
            }
            if let Some(group) = groups.iter().position(Vec::is_empty) {
                return Err(MalformedInstance::EmptyGroup {
                    constraint: index,
                    group,
                });
            }
        }

        Ok(())
    }

    /// Sorts and deduplicates the sets held by the constraint.
    ///
    /// Scopes, teams and user lists are sets; their order in the source carries no meaning.
    pub(crate) fn normalise(&mut self) {
        fn normalise_set<T: Ord>(items: &mut Vec<T>) {
            items.sort();
            items.dedup();
        }

        match self {
            Constraint::Authorization(authorization) => normalise_set(&mut authorization.steps),
            Constraint::SeparationOfDuty(_) | Constraint::BindingOfDuty(_) => {}
            Constraint::AtMostK(constraint) => normalise_set(&mut constraint.steps),
            Constraint::OneTeam(constraint) => {
                normalise_set(&mut constraint.steps);
                constraint.teams.iter_mut().for_each(normalise_set);
            }
            Constraint::SuperUserAtLeast(constraint) => {
                normalise_set(&mut constraint.steps);
                normalise_set(&mut constraint.super_users);
            }
            Constraint::WangLi(constraint) => {
                normalise_set(&mut constraint.steps);
                constraint.departments.iter_mut().for_each(normalise_set);
            }
            Constraint::AssignmentDependent(constraint) => {
                normalise_set(&mut constraint.source_users);
                normalise_set(&mut constraint.target_users);
            }
        }
    }

    pub(crate) fn encode(&self, context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        match self {
            Constraint::Authorization(constraint) => constraint.encode(context),
            Constraint::SeparationOfDuty(constraint) => constraint.encode(context),
            Constraint::BindingOfDuty(constraint) => constraint.encode(context),
            Constraint::AtMostK(constraint) => constraint.encode(context),
            Constraint::OneTeam(constraint) => constraint.encode(context),
            Constraint::SuperUserAtLeast(constraint) => constraint.encode(context),
            Constraint::WangLi(constraint) => constraint.encode(context),
            Constraint::AssignmentDependent(constraint) => constraint.encode(context),
        }
    }

    pub(crate) fn evaluate(&self, context: &EvaluationContext<'_>) -> Vec<Violation> {
        match self {
            Constraint::Authorization(constraint) => constraint.evaluate(context),
            Constraint::SeparationOfDuty(constraint) => constraint.evaluate(context),
            Constraint::BindingOfDuty(constraint) => constraint.evaluate(context),
            Constraint::AtMostK(constraint) => constraint.evaluate(context),
            Constraint::OneTeam(constraint) => constraint.evaluate(context),
            Constraint::SuperUserAtLeast(constraint) => constraint.evaluate(context),
            Constraint::WangLi(constraint) => constraint.evaluate(context),
            Constraint::AssignmentDependent(constraint) => constraint.evaluate(context),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Constraint {
                fn from(constraint: $variant) -> Self {
                    Constraint::$variant(constraint)
                }
            }
        )*
    };
}

impl_from_variant!(
    Authorization,
    SeparationOfDuty,
    BindingOfDuty,
    AtMostK,
    OneTeam,
    SuperUserAtLeast,
    WangLi,
    AssignmentDependent
);

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(ids: &[u32]) -> Vec<StepId> {
        ids.iter().copied().map(StepId::new).collect()
    }

    #[test]
    fn only_super_user_at_least_is_unsupported_in_cs() {
        for kind in ConstraintKind::all() {
            assert_eq!(
                kind.supported_in(EncodingMode::ConstraintSatisfaction),
                kind != ConstraintKind::SuperUserAtLeast
            );
            assert!(kind.supported_in(EncodingMode::PatternBased));
            assert!(kind.supported_in(EncodingMode::UserDependent));
        }
    }

    #[test]
    fn zero_limit_is_rejected() {
        let constraint: Constraint = AtMostK::new(0, steps(&[1, 2])).into();
        let index = ConstraintIndex::new(0);

        assert_eq!(
            constraint.validate(index, 2, 2),
            Err(MalformedInstance::ZeroLimit { constraint: index })
        );
    }

    #[test]
    fn undeclared_steps_are_rejected() {
        let constraint: Constraint = SeparationOfDuty::new(StepId::new(1), StepId::new(3)).into();
        let index = ConstraintIndex::new(4);

        assert_eq!(
            constraint.validate(index, 2, 2),
            Err(MalformedInstance::UndeclaredStep {
                constraint: index,
                step: StepId::new(3)
            })
        );
    }

    #[test]
    fn empty_teams_are_rejected() {
        let constraint: Constraint =
            OneTeam::new(steps(&[1]), vec![vec![UserId::new(1)], vec![]]).into();
        let index = ConstraintIndex::new(0);

        assert_eq!(
            constraint.validate(index, 1, 1),
            Err(MalformedInstance::EmptyGroup {
                constraint: index,
                group: 1
            })
        );
    }

    #[test]
    fn normalising_sorts_and_deduplicates_scopes() {
        let mut constraint: Constraint = AtMostK::new(1, steps(&[3, 1, 3, 2])).into();
        constraint.normalise();

        assert_eq!(constraint.steps(), steps(&[1, 2, 3]));
    }
}
