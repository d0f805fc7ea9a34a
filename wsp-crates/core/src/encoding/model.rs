use std::fmt::Display;

use super::Assertion;
use super::BoolVar;
use super::Diagnostic;
use super::EncodingMode;
use super::EncodingStatistics;
use super::Formula;
use super::ModelEvaluator;
use super::SearchOutcome;
use super::VariableOrigin;
use crate::basic_types::format_set;
use crate::basic_types::Assignment;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::containers::KeyedVec;
use crate::termination::Indefinite;

/// The variable of one step.
///
/// In the constraint-satisfaction encoding the step is a finite-domain variable over `domain`
/// and `decisions` is empty. In the pseudo-boolean encodings `decisions[i]` states that the step
/// is performed by `domain[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepVariable {
    pub step: StepId,
    pub domain: Vec<UserId>,
    pub decisions: Vec<BoolVar>,
}

/// The output of the compiler, consumed by the solver backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingModel {
    mode: EncodingMode,
    num_users: u32,
    steps: KeyedVec<StepId, StepVariable>,
    variables: KeyedVec<BoolVar, VariableOrigin>,
    assertions: Vec<Assertion>,
    diagnostics: Vec<Diagnostic>,
}

impl EncodingModel {
    pub(crate) fn new(
        mode: EncodingMode,
        num_users: u32,
        steps: KeyedVec<StepId, StepVariable>,
        variables: KeyedVec<BoolVar, VariableOrigin>,
        assertions: Vec<Assertion>,
        diagnostics: Vec<Diagnostic>,
    ) -> EncodingModel {
        EncodingModel {
            mode,
            num_users,
            steps,
            variables,
            assertions,
            diagnostics,
        }
    }

    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn num_users(&self) -> u32 {
        self.num_users
    }

    pub fn steps(&self) -> impl Iterator<Item = &StepVariable> + '_ {
        self.steps.iter()
    }

    pub fn step(&self, step: StepId) -> Option<&StepVariable> {
        if step.id() == 0 {
            return None;
        }
        self.steps.get(step)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// All boolean variables with what they stand for, in allocation order.
    pub fn variables(&self) -> impl Iterator<Item = (BoolVar, &VariableOrigin)> + '_ {
        self.variables.iter_keyed()
    }

    pub fn origin(&self, variable: BoolVar) -> Option<&VariableOrigin> {
        self.variables.get(variable)
    }

    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn statistics(&self) -> EncodingStatistics {
        let mut statistics = EncodingStatistics {
            num_variables: self.variables.len(),
            num_decision_variables: self
                .variables
                .iter()
                .filter(|origin| matches!(origin, VariableOrigin::Decision { .. }))
                .count(),
            ..Default::default()
        };
        statistics.num_auxiliary_variables =
            statistics.num_variables - statistics.num_decision_variables;

        for assertion in &self.assertions {
            match assertion.formula {
                Formula::Clause(_) => statistics.num_clauses += 1,
                Formula::Linear(_) => statistics.num_linear_constraints += 1,
                Formula::Relation(_) => statistics.num_relations += 1,
            }
        }
        statistics.num_diagnostics = self.diagnostics.len();

        statistics
    }

    /// Whether `assignment` gives every step of the model exactly one user, and some valuation of
    /// the auxiliary variables satisfies all assertions together with it.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        let mut users: KeyedVec<StepId, Option<UserId>> =
            KeyedVec::filled(self.steps.len(), None);
        for &(step, user) in assignment.pairs() {
            if step.id() == 0 || step.id() as usize > self.steps.len() {
                return false;
            }
            if users[step].replace(user).is_some() {
                return false;
            }
        }

        let mut evaluator = ModelEvaluator::new(self);
        for (step, user) in users.iter_keyed() {
            let Some(&user) = user.as_ref() else {
                return false;
            };
            if !evaluator.assign_step(step, user) {
                return false;
            }
        }

        evaluator.complete(&mut Indefinite) == SearchOutcome::Satisfied
    }
}

impl Display for EncodingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "mode {}", self.mode)?;

        for variable in self.steps.iter() {
            writeln!(f, "step {} in {}", variable.step, format_set(&variable.domain))?;
        }

        for (variable, origin) in self.variables.iter_keyed() {
            writeln!(f, "var {variable} = {origin}")?;
        }

        for assertion in &self.assertions {
            writeln!(f, "[{}] {}", assertion.origin, assertion.formula)?;
        }

        for diagnostic in &self.diagnostics {
            writeln!(f, "warning: {diagnostic}")?;
        }

        Ok(())
    }
}
