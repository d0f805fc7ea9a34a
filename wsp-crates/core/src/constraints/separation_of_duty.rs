use crate::basic_types::StepId;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::encoding::EncodingMode;
use crate::encoding::Literal;
use crate::encoding::Relation;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// The two steps must be performed by different users.
///
/// A constraint separating a step from itself can never be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparationOfDuty {
    pub first: StepId,
    pub second: StepId,
}

impl SeparationOfDuty {
    pub fn new(first: StepId, second: StepId) -> SeparationOfDuty {
        SeparationOfDuty { first, second }
    }

    pub(crate) fn encode(&self, context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        match context.mode() {
            EncodingMode::ConstraintSatisfaction => {
                context.add_relation(Relation::NotEqual(self.first, self.second));
            }
            EncodingMode::PatternBased | EncodingMode::UserDependent => {
                for &user in context.domain(self.first) {
                    let (Some(x_first), Some(x_second)) = (
                        context.decision(self.first, user),
                        context.decision(self.second, user),
                    ) else {
                        continue;
                    };
                    context.add_clause([!Literal::from(x_first), !Literal::from(x_second)]);
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

        if users[0] == users[1] {
            vec![Violation::SameUser {
                first: self.first,
                second: self.second,
                user: users[0],
            }]
        } else {
            vec![]
        }
    }
}
