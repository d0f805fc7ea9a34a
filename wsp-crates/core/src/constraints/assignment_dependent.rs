use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::encoding::AuxKey;
use crate::encoding::AuxKind;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::encoding::EncodingMode;
use crate::encoding::Literal;
use crate::encoding::Relation;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// If `source_step` is performed by one of `source_users`, then `target_step` has to be
/// performed by one of `target_users`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDependent {
    pub source_step: StepId,
    pub target_step: StepId,
    pub source_users: Vec<UserId>,
    pub target_users: Vec<UserId>,
}

impl AssignmentDependent {
    pub fn new(
        source_step: StepId,
        target_step: StepId,
        source_users: Vec<UserId>,
        target_users: Vec<UserId>,
    ) -> AssignmentDependent {
        AssignmentDependent {
            source_step,
            target_step,
            source_users,
            target_users,
        }
    }

    fn is_source(&self, user: UserId) -> bool {
        self.source_users.binary_search(&user).is_ok()
    }

    fn is_target(&self, user: UserId) -> bool {
        self.target_users.binary_search(&user).is_ok()
    }

    pub(crate) fn encode(&self, context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        let sources = context
            .domain(self.source_step)
            .iter()
            .filter(|&&user| self.is_source(user))
            .filter_map(|&user| context.decision(self.source_step, user))
            .collect::<Vec<_>>();
        let (targets, forbidden): (Vec<_>, Vec<_>) = context
            .domain(self.target_step)
            .iter()
            .filter_map(|&user| {
                context
                    .decision(self.target_step, user)
                    .map(|decision| (user, decision))
            })
            .partition(|&(user, _)| self.is_target(user));

        match context.mode() {
            EncodingMode::ConstraintSatisfaction => {
                context.add_relation(Relation::Implication {
                    antecedent: self.source_step,
                    antecedent_users: self.source_users.clone(),
                    consequent: self.target_step,
                    consequent_users: self.target_users.clone(),
                });
            }
            EncodingMode::PatternBased => {
                for &source in &sources {
                    for &(_, target) in &forbidden {
                        context.add_clause([!Literal::from(source), !Literal::from(target)]);
                    }
                }
            }
            EncodingMode::UserDependent => {
                if sources.is_empty() {
                    return Ok(());
                }

                let (indicator, _) = context.auxiliary(
                    AuxKind::SourceIndicator,
                    AuxKey::Constraint(context.constraint()),
                )?;
                for &source in &sources {
                    context.add_clause([!Literal::from(source), indicator.into()]);
                }
                context.add_clause(
                    std::iter::once(!Literal::from(indicator))
                        .chain(sources.iter().map(|&source| Literal::from(source))),
                );
                context.add_clause(
                    std::iter::once(!Literal::from(indicator))
                        .chain(targets.iter().map(|&(_, target)| Literal::from(target))),
                );
            }
        }
        Ok(())
    }

    pub(crate) fn evaluate(&self, context: &EvaluationContext<'_>) -> Vec<Violation> {
        let users = match context.resolve(&[self.source_step, self.target_step]) {
            Ok(users) => users,
            Err(violation) => return vec![violation],
        };

        if self.is_source(users[0]) && !self.is_target(users[1]) {
            vec![Violation::TargetNotAllowed {
                source_step: self.source_step,
                source_user: users[0],
                target_step: self.target_step,
                target_user: users[1],
            }]
        } else {
            vec![]
        }
    }
}
