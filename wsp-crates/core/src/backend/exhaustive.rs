use log::debug;

use super::BackendResult;
use super::SolverBackend;
use crate::basic_types::Assignment;
use crate::basic_types::StepId;
use crate::encoding::Diagnostic;
use crate::encoding::EncodingMode;
use crate::encoding::EncodingModel;
use crate::encoding::ModelEvaluator;
use crate::encoding::SearchOutcome;
use crate::termination::TerminationCondition;

/// Solutions found by [`ExhaustiveSearch::enumerate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub solutions: Vec<Assignment>,
    /// Whether the search space was exhausted; if not, more solutions may exist.
    pub is_complete: bool,
}

/// Tries every user for every step in order, pruning partial assignments which certainly violate
/// an assertion of the model.
///
/// Works for all encoding modes; exponential in the number of steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveSearch {
    num_decisions: u64,
}

impl ExhaustiveSearch {
    /// The number of step assignments tried by the last search.
    pub fn num_decisions(&self) -> u64 {
        self.num_decisions
    }

    /// Collects up to `limit` solutions of `model`.
    pub fn enumerate(
        &mut self,
        model: &EncodingModel,
        limit: usize,
        termination: &mut dyn TerminationCondition,
    ) -> Enumeration {
        self.num_decisions = 0;

        let steps = model.steps().map(|variable| variable.step).collect::<Vec<_>>();
        let mut evaluator = ModelEvaluator::new(model);
        let mut solutions = vec![];

        let outcome = if limit == 0 {
            SearchOutcome::Interrupted
        } else {
            self.search(
                model,
                &steps,
                &mut evaluator,
                limit,
                &mut solutions,
                termination,
            )
        };
        debug!(
            "exhaustive search tried {} assignments and found {} solutions",
            self.num_decisions,
            solutions.len()
        );

        Enumeration {
            solutions,
            is_complete: outcome == SearchOutcome::Unsatisfiable,
        }
    }

    /// Returns [`SearchOutcome::Interrupted`] when the search stopped early, either because of the
    /// termination condition or because `limit` solutions were found.
    fn search(
        &mut self,
        model: &EncodingModel,
        steps: &[StepId],
        evaluator: &mut ModelEvaluator<'_>,
        limit: usize,
        solutions: &mut Vec<Assignment>,
        termination: &mut dyn TerminationCondition,
    ) -> SearchOutcome {
        let Some((&step, remaining)) = steps.split_first() else {
            return match evaluator.complete(termination) {
                SearchOutcome::Satisfied => {
                    solutions.push(
                        model
                            .steps()
                            .filter_map(|variable| {
                                evaluator
                                    .user_of(variable.step)
                                    .map(|user| (variable.step, user))
                            })
                            .collect(),
                    );
                    if solutions.len() >= limit {
                        SearchOutcome::Interrupted
                    } else {
                        SearchOutcome::Unsatisfiable
                    }
                }
                outcome => outcome,
            };
        };

        let Some(variable) = model.step(step) else {
            return SearchOutcome::Unsatisfiable;
        };

        for &user in &variable.domain {
            if termination.should_stop() {
                return SearchOutcome::Interrupted;
            }

            self.num_decisions += 1;
            termination.decision_has_been_made();

            let mark = evaluator.mark();
            let outcome = if evaluator.assign_step(step, user) {
                self.search(model, remaining, evaluator, limit, solutions, termination)
            } else {
                SearchOutcome::Unsatisfiable
            };
            evaluator.backtrack(mark);

            if outcome == SearchOutcome::Interrupted {
                return outcome;
            }
        }

        SearchOutcome::Unsatisfiable
    }
}

impl SolverBackend for ExhaustiveSearch {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn supports(&self, _mode: EncodingMode) -> bool {
        true
    }

    fn solve(
        &mut self,
        model: &EncodingModel,
        termination: &mut dyn TerminationCondition,
    ) -> BackendResult {
        let enumeration = self.enumerate(model, 1, termination);

        match enumeration.solutions.into_iter().next() {
            Some(solution) => BackendResult::Satisfiable(solution),
            None if enumeration.is_complete => BackendResult::Unsatisfiable {
                diagnostic: model
                    .diagnostics()
                    .iter()
                    .find(|diagnostic| diagnostic.is_conflict())
                    .map(Diagnostic::to_string),
            },
            None => BackendResult::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::UserId;
    use crate::constraints::ConstraintKind;
    use crate::constraints::SeparationOfDuty;
    use crate::encoding::compile;
    use crate::instance::Instance;
    use crate::instance::InstanceRecord;
    use crate::termination::DecisionBudget;
    use crate::termination::Indefinite;

    fn separated_instance() -> Instance {
        Instance::new(InstanceRecord::new(
            2,
            2,
            vec![SeparationOfDuty::new(StepId::new(1), StepId::new(2)).into()],
        ))
        .expect("valid instance")
    }

    #[test]
    fn all_solutions_are_enumerated() {
        for mode in [
            EncodingMode::ConstraintSatisfaction,
            EncodingMode::PatternBased,
            EncodingMode::UserDependent,
        ] {
            let model =
                compile(&separated_instance(), ConstraintKind::all(), mode).expect("compiles");

            let enumeration = ExhaustiveSearch::default().enumerate(&model, 10, &mut Indefinite);

            assert!(enumeration.is_complete);
            assert_eq!(
                enumeration.solutions,
                vec![
                    Assignment::from_users([UserId::new(1), UserId::new(2)]),
                    Assignment::from_users([UserId::new(2), UserId::new(1)]),
                ]
            );
        }
    }

    #[test]
    fn reaching_the_limit_leaves_the_enumeration_incomplete() {
        let model = compile(
            &separated_instance(),
            ConstraintKind::all(),
            EncodingMode::PatternBased,
        )
        .expect("compiles");

        let enumeration = ExhaustiveSearch::default().enumerate(&model, 1, &mut Indefinite);

        assert!(!enumeration.is_complete);
        assert_eq!(enumeration.solutions.len(), 1);
    }

    #[test]
    fn an_exhausted_budget_gives_unknown() {
        let model = compile(
            &separated_instance(),
            ConstraintKind::all(),
            EncodingMode::ConstraintSatisfaction,
        )
        .expect("compiles");

        let result = ExhaustiveSearch::default().solve(&model, &mut DecisionBudget::new(0));

        assert_eq!(result, BackendResult::Unknown);
    }
}
