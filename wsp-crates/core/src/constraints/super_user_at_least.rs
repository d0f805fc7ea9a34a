use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::constraints::ConstraintKind;
use crate::encoding::AuxKey;
use crate::encoding::AuxKind;
use crate::encoding::Comparison;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::encoding::EncodingMode;
use crate::encoding::Literal;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// If fewer than `threshold` distinct users perform the steps of the scope, one of the steps is
/// performed by a super-user.
///
/// Reaching the threshold exactly does not require a super-user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperUserAtLeast {
    pub threshold: u32,
    pub steps: Vec<StepId>,
    pub super_users: Vec<UserId>,
}

impl SuperUserAtLeast {
    pub fn new(threshold: u32, steps: Vec<StepId>, super_users: Vec<UserId>) -> SuperUserAtLeast {
        SuperUserAtLeast {
            threshold,
            steps,
            super_users,
        }
    }

    fn is_super_user(&self, user: UserId) -> bool {
        self.super_users.binary_search(&user).is_ok()
    }

    pub(crate) fn encode(&self, context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        if context.mode() == EncodingMode::ConstraintSatisfaction {
            return Err(context.unsupported(ConstraintKind::SuperUserAtLeast));
        }

        // A scope never has fewer than zero users.
        if self.threshold == 0 {
            return Ok(());
        }

        let constraint = context.constraint();
        let (reached, _) =
            context.auxiliary(AuxKind::ThresholdIndicator, AuxKey::Constraint(constraint))?;
        let threshold = i64::from(self.threshold);

        let mut fallback = vec![Literal::from(reached)];
        match context.mode() {
            EncodingMode::PatternBased => {
                // The first step of the scope always introduces a new user, hence the bound of -1.
                let mut terms = vec![];
                for (position, &step) in self.steps.iter().enumerate().skip(1) {
                    let (first, _) = context
                        .auxiliary(AuxKind::FirstOccurrence, AuxKey::Step(constraint, step))?;
                    for &earlier in &self.steps[..position] {
                        let same = context.same_user(earlier, step)?;
                        context.add_clause([!Literal::from(first), !Literal::from(same)]);
                    }
                    terms.push((1, first));
                }
                terms.push((-threshold, reached));
                context.add_linear(terms, Comparison::GreaterEqual, -1);

                for &step in &self.steps {
                    for &user in context.domain(step) {
                        if !self.is_super_user(user) {
                            continue;
                        }
                        if let Some(decision) = context.decision(step, user) {
                            fallback.push(decision.into());
                        }
                    }
                }
            }
            EncodingMode::UserDependent => {
                let mut terms = vec![];
                for user in context.participants(&self.steps) {
                    let participates = context.participation(&self.steps, user)?;
                    terms.push((1, participates));
                    if self.is_super_user(user) {
                        fallback.push(participates.into());
                    }
                }
                terms.push((-threshold, reached));
                context.add_linear(terms, Comparison::GreaterEqual, 0);
            }
            EncodingMode::ConstraintSatisfaction => {}
        }
        context.add_clause(fallback);

        Ok(())
    }

    pub(crate) fn evaluate(&self, context: &EvaluationContext<'_>) -> Vec<Violation> {
        let users = match context.distinct_users(&self.steps) {
            Ok(users) => users,
            Err(violation) => return vec![violation],
        };

        if users.len() >= self.threshold as usize
            || users.iter().any(|&user| self.is_super_user(user))
        {
            vec![]
        } else {
            vec![Violation::MissingSuperUser {
                users,
                threshold: self.threshold,
            }]
        }
    }
}
