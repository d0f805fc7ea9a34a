use itertools::Itertools;

use crate::basic_types::StepId;
use crate::encoding::Comparison;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::encoding::EncodingMode;
use crate::encoding::Literal;
use crate::encoding::Relation;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// At most `limit` distinct users perform the steps of the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtMostK {
    pub limit: u32,
    pub steps: Vec<StepId>,
}

impl AtMostK {
    pub fn new(limit: u32, steps: Vec<StepId>) -> AtMostK {
        AtMostK { limit, steps }
    }

    pub(crate) fn encode(&self, context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        match context.mode() {
            EncodingMode::ConstraintSatisfaction => {
                context.add_relation(Relation::AtMostDistinct {
                    steps: self.steps.clone(),
                    limit: self.limit,
                });
            }
            EncodingMode::PatternBased => {
                let subset_size = self.limit as usize + 1;
                if self.steps.len() < subset_size {
                    return Ok(());
                }

                // Among any k + 1 steps, two have to share their user.
                for subset in self.steps.iter().copied().combinations(subset_size) {
                    let mut clause = vec![];
                    for (first, second) in subset.iter().copied().tuple_combinations() {
                        clause.push(Literal::from(context.same_user(first, second)?));
                    }
                    context.add_clause(clause);
                }
            }
            EncodingMode::UserDependent => {
                let participants = context.participants(&self.steps);
                if participants.len() <= self.limit as usize {
                    return Ok(());
                }

                let mut terms = vec![];
                for user in participants {
                    terms.push((1, context.participation(&self.steps, user)?));
                }
                context.add_linear(terms, Comparison::LessEqual, i64::from(self.limit));
            }
        }
        Ok(())
    }

    pub(crate) fn evaluate(&self, context: &EvaluationContext<'_>) -> Vec<Violation> {
        match context.distinct_users(&self.steps) {
            Ok(users) if users.len() > self.limit as usize => vec![Violation::TooManyUsers {
                users,
                limit: self.limit,
            }],
            Ok(_) => vec![],
            Err(violation) => vec![violation],
        }
    }
}
