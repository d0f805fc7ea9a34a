use crate::basic_types::StepId;
use crate::encoding::Diagnostic;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::encoding::EncodingMode;
use crate::encoding::Literal;
use crate::encoding::Relation;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// The two steps must be performed by the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingOfDuty {
    pub first: StepId,
    pub second: StepId,
}

impl BindingOfDuty {
    pub fn new(first: StepId, second: StepId) -> BindingOfDuty {
        BindingOfDuty { first, second }
    }

    pub(crate) fn encode(&self, context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        if self.first == self.second {
            return Ok(());
        }

        let has_common_user = context
            .domain(self.first)
            .iter()
            .any(|&user| context.in_domain(self.second, user));
        if !has_common_user {
            context.diagnose(Diagnostic::NoCommonUser {
                constraint: context.constraint(),
                first: self.first,
                second: self.second,
            });
        }

        match context.mode() {
            EncodingMode::ConstraintSatisfaction => {
                context.add_relation(Relation::Equal(self.first, self.second));
            }
            EncodingMode::PatternBased | EncodingMode::UserDependent => {
                for user in context.participants(&[self.first, self.second]) {
                    match (
                        context.decision(self.first, user),
                        context.decision(self.second, user),
                    ) {
                        (Some(x_first), Some(x_second)) => {
                            context.add_clause([!Literal::from(x_first), x_second.into()]);
                            context.add_clause([x_first.into(), !Literal::from(x_second)]);
                        }
                        (Some(only), None) | (None, Some(only)) => {
                            context.add_clause([!Literal::from(only)]);
                        }
                        (None, None) => {}
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn evaluate(&self, context: &EvaluationContext<'_>) -> Vec<Violation> {
        let users = match context.resolve(&[self.first, self.second]) {
            Ok(users) => users,
            Err(violation) => return vec![violation],
        };

        if users[0] != users[1] {
            vec![Violation::DifferentUsers {
                first: self.first,
                first_user: users[0],
                second: self.second,
                second_user: users[1],
            }]
        } else {
            vec![]
        }
    }
}
