//! Evaluation of partially assigned models.
//!
//! Assertions are evaluated in three-valued logic so that a search can abandon a branch as soon
//! as one assertion is certainly violated.
use itertools::Itertools;

use super::Assertion;
use super::BoolVar;
use super::EncodingModel;
use super::Formula;
use super::Linear;
use super::Literal;
use super::VariableOrigin;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::containers::KeyedVec;
use crate::termination::TerminationCondition;
use crate::wsp_assert_moderate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AssertionStatus {
    Satisfied,
    Violated,
    Undetermined,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    Satisfied,
    Unsatisfiable,
    Interrupted,
}

#[derive(Clone, Copy, Debug)]
enum Change {
    Variable(BoolVar),
    Step(StepId),
}

/// Holds a partial assignment of steps and variables of one [`EncodingModel`].
///
/// Changes are recorded on a trail; [`ModelEvaluator::backtrack`] undoes them up to a mark.
#[derive(Debug)]
pub(crate) struct ModelEvaluator<'model> {
    model: &'model EncodingModel,
    values: KeyedVec<BoolVar, Option<bool>>,
    users: KeyedVec<StepId, Option<UserId>>,
    /// For every variable, the assertions it occurs in.
    variable_occurrences: KeyedVec<BoolVar, Vec<usize>>,
    /// For every step, the relations over it.
    step_occurrences: KeyedVec<StepId, Vec<usize>>,
    auxiliaries: Vec<BoolVar>,
    trail: Vec<Change>,
}

impl<'model> ModelEvaluator<'model> {
    pub(crate) fn new(model: &'model EncodingModel) -> ModelEvaluator<'model> {
        let mut variable_occurrences = KeyedVec::filled(model.num_variables(), vec![]);
        let mut step_occurrences = KeyedVec::filled(model.num_steps(), vec![]);

        for (index, assertion) in model.assertions().iter().enumerate() {
            match &assertion.formula {
                Formula::Clause(literals) => {
                    for variable in literals.iter().map(|literal| literal.variable()).unique() {
                        variable_occurrences[variable].push(index);
                    }
                }
                Formula::Linear(linear) => {
                    for variable in linear.terms.iter().map(|&(_, variable)| variable).unique() {
                        variable_occurrences[variable].push(index);
                    }
                }
                Formula::Relation(relation) => {
                    for step in relation.steps().into_iter().unique() {
                        step_occurrences[step].push(index);
                    }
                }
            }
        }

        let auxiliaries = model
            .variables()
            .filter(|(_, origin)| matches!(origin, VariableOrigin::Auxiliary { .. }))
            .map(|(variable, _)| variable)
            .collect();

        ModelEvaluator {
            model,
            values: KeyedVec::filled(model.num_variables(), None),
            users: KeyedVec::filled(model.num_steps(), None),
            variable_occurrences,
            step_occurrences,
            auxiliaries,
            trail: vec![],
        }
    }

    pub(crate) fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Undoes every change made after `mark` was taken.
    pub(crate) fn backtrack(&mut self, mark: usize) {
        while self.trail.len() > mark {
            match self.trail.pop() {
                Some(Change::Variable(variable)) => self.values[variable] = None,
                Some(Change::Step(step)) => self.users[step] = None,
                None => break,
            }
        }
    }

    pub(crate) fn user_of(&self, step: StepId) -> Option<UserId> {
        self.users.get(step).copied().flatten()
    }

    /// Gives `step` to `user` and fixes the decision variables of the step accordingly.
    ///
    /// Returns `false` if an assertion is certainly violated afterwards. The changes are recorded
    /// on the trail in both cases.
    pub(crate) fn assign_step(&mut self, step: StepId, user: UserId) -> bool {
        let model = self.model;
        let Some(variable) = model.step(step) else {
            return false;
        };
        wsp_assert_moderate!(self.users[step].is_none(), "step {step} is assigned twice");

        self.users[step] = Some(user);
        self.trail.push(Change::Step(step));

        if variable.domain.binary_search(&user).is_err() {
            return false;
        }

        for (&candidate, &decision) in variable.domain.iter().zip(&variable.decisions) {
            self.set(decision, candidate == user);
        }

        let relations_hold = self.step_occurrences[step]
            .iter()
            .all(|&index| self.status(&model.assertions()[index]) != AssertionStatus::Violated);

        relations_hold
            && variable
                .decisions
                .iter()
                .all(|&decision| !self.violates(decision))
    }

    /// Searches a valuation of the auxiliary variables which, together with the current state,
    /// satisfies every assertion. The state is left unchanged.
    pub(crate) fn complete(&mut self, termination: &mut dyn TerminationCondition) -> SearchOutcome {
        let mark = self.mark();
        let outcome = self.search_auxiliaries(0, termination);
        self.backtrack(mark);
        outcome
    }

    fn search_auxiliaries(
        &mut self,
        position: usize,
        termination: &mut dyn TerminationCondition,
    ) -> SearchOutcome {
        if termination.should_stop() {
            return SearchOutcome::Interrupted;
        }

        let Some(&variable) = self.auxiliaries.get(position) else {
            let model = self.model;
            let all_satisfied = model
                .assertions()
                .iter()
                .all(|assertion| self.status(assertion) == AssertionStatus::Satisfied);
            return if all_satisfied {
                SearchOutcome::Satisfied
            } else {
                SearchOutcome::Unsatisfiable
            };
        };

        if self.variable_occurrences[variable].is_empty() {
            return self.search_auxiliaries(position + 1, termination);
        }

        for value in [false, true] {
            let mark = self.mark();
            self.set(variable, value);

            if !self.violates(variable) {
                match self.search_auxiliaries(position + 1, termination) {
                    SearchOutcome::Unsatisfiable => {}
                    outcome => {
                        self.backtrack(mark);
                        return outcome;
                    }
                }
            }

            self.backtrack(mark);
        }

        SearchOutcome::Unsatisfiable
    }

    fn set(&mut self, variable: BoolVar, value: bool) {
        self.values[variable] = Some(value);
        self.trail.push(Change::Variable(variable));
    }

    /// Whether one of the assertions containing `variable` is certainly violated.
    fn violates(&self, variable: BoolVar) -> bool {
        let model = self.model;
        self.variable_occurrences[variable]
            .iter()
            .any(|&index| self.status(&model.assertions()[index]) == AssertionStatus::Violated)
    }

    pub(crate) fn status(&self, assertion: &Assertion) -> AssertionStatus {
        match &assertion.formula {
            Formula::Clause(literals) => self.clause_status(literals),
            Formula::Linear(linear) => self.linear_status(linear),
            Formula::Relation(relation) => match relation.holds(|step| self.user_of(step)) {
                Some(true) => AssertionStatus::Satisfied,
                Some(false) => AssertionStatus::Violated,
                None => AssertionStatus::Undetermined,
            },
        }
    }

    fn clause_status(&self, literals: &[Literal]) -> AssertionStatus {
        let mut is_undetermined = false;
        for &literal in literals {
            match self.values[literal.variable()] {
                Some(value) if literal.evaluate(value) => return AssertionStatus::Satisfied,
                Some(_) => {}
                None => is_undetermined = true,
            }
        }

        if is_undetermined {
            AssertionStatus::Undetermined
        } else {
            AssertionStatus::Violated
        }
    }

    fn linear_status(&self, linear: &Linear) -> AssertionStatus {
        // The range of values the left-hand side can still take.
        let (mut lowest, mut highest) = (0_i64, 0_i64);
        for &(weight, variable) in &linear.terms {
            match self.values[variable] {
                Some(true) => {
                    lowest += weight;
                    highest += weight;
                }
                Some(false) => {}
                None => {
                    lowest += weight.min(0);
                    highest += weight.max(0);
                }
            }
        }

        let bound = linear.bound;
        let (certainly_holds, certainly_fails) = match linear.comparison {
            super::Comparison::LessEqual => (highest <= bound, lowest > bound),
            super::Comparison::GreaterEqual => (lowest >= bound, highest < bound),
            super::Comparison::Equal => (
                lowest == bound && highest == bound,
                bound < lowest || bound > highest,
            ),
        };

        if certainly_holds {
            AssertionStatus::Satisfied
        } else if certainly_fails {
            AssertionStatus::Violated
        } else {
            AssertionStatus::Undetermined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Assignment;
    use crate::constraints::AtMostK;
    use crate::constraints::ConstraintKind;
    use crate::constraints::SuperUserAtLeast;
    use crate::encoding::compile;
    use crate::encoding::EncodingMode;
    use crate::instance::Instance;
    use crate::instance::InstanceRecord;
    use crate::termination::Indefinite;

    fn step(id: u32) -> StepId {
        StepId::new(id)
    }

    fn user(id: u32) -> UserId {
        UserId::new(id)
    }

    fn users(ids: &[u32]) -> Assignment {
        Assignment::from_users(ids.iter().copied().map(user))
    }

    #[test]
    fn linear_constraints_are_decided_once_the_range_is_known() {
        let instance = Instance::new(InstanceRecord::new(2, 2, vec![])).expect("valid instance");
        let model = compile(&instance, ConstraintKind::all(), EncodingMode::PatternBased)
            .expect("compiles");
        let mut evaluator = ModelEvaluator::new(&model);

        let exactly_one = &model.assertions()[0];
        assert_eq!(evaluator.status(exactly_one), AssertionStatus::Undetermined);

        assert!(evaluator.assign_step(step(1), user(2)));
        assert_eq!(evaluator.status(exactly_one), AssertionStatus::Satisfied);

        evaluator.backtrack(0);
        assert_eq!(evaluator.status(exactly_one), AssertionStatus::Undetermined);
    }

    #[test]
    fn auxiliary_variables_are_searched() {
        let instance = Instance::new(InstanceRecord::new(
            3,
            3,
            vec![AtMostK::new(2, vec![step(1), step(2), step(3)]).into()],
        ))
        .expect("valid instance");

        for mode in [EncodingMode::PatternBased, EncodingMode::UserDependent] {
            let model = compile(&instance, ConstraintKind::all(), mode).expect("compiles");

            assert!(model.is_satisfied_by(&users(&[1, 2, 1])));
            assert!(!model.is_satisfied_by(&users(&[1, 2, 3])));
        }
    }

    #[test]
    fn incomplete_assignments_are_not_admitted() {
        let instance = Instance::new(InstanceRecord::new(
            2,
            2,
            vec![SuperUserAtLeast::new(2, vec![step(1), step(2)], vec![user(1)]).into()],
        ))
        .expect("valid instance");
        let model =
            compile(&instance, ConstraintKind::all(), EncodingMode::UserDependent).expect("compiles");

        assert!(!model.is_satisfied_by(&users(&[2])));
        assert!(!model.is_satisfied_by(&users(&[2, 2, 2])));
        assert!(model.is_satisfied_by(&users(&[1, 2])));

        let mut evaluator = ModelEvaluator::new(&model);
        assert!(evaluator.assign_step(step(1), user(2)));
        assert!(evaluator.assign_step(step(2), user(2)));
        assert_eq!(
            evaluator.complete(&mut Indefinite),
            SearchOutcome::Unsatisfiable
        );
    }
}
