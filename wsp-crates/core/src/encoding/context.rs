use itertools::Itertools;

use super::Assertion;
use super::AssertionOrigin;
use super::AuxKey;
use super::AuxKind;
use super::BoolVar;
use super::Comparison;
use super::Diagnostic;
use super::EncodingError;
use super::EncodingMode;
use super::Formula;
use super::Linear;
use super::Literal;
use super::Relation;
use super::VariableNamespace;
use crate::basic_types::ConstraintIndex;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::constraints::ConstraintKind;
use crate::containers::KeyedVec;
use crate::instance::Instance;
use crate::options::SemanticOptions;

/// The state a constraint writes its encoding into.
///
/// Every assertion added through the context is attributed to the constraint which is currently
/// being encoded.
#[derive(Debug)]
pub(crate) struct EncodingContext<'a> {
    instance: &'a Instance,
    options: SemanticOptions,
    mode: EncodingMode,
    domains: &'a KeyedVec<StepId, Vec<UserId>>,
    namespace: VariableNamespace,
    assertions: Vec<Assertion>,
    diagnostics: Vec<Diagnostic>,
    constraint: ConstraintIndex,
}

impl<'a> EncodingContext<'a> {
    pub(crate) fn new(
        instance: &'a Instance,
        options: SemanticOptions,
        mode: EncodingMode,
        domains: &'a KeyedVec<StepId, Vec<UserId>>,
    ) -> EncodingContext<'a> {
        EncodingContext {
            instance,
            options,
            mode,
            domains,
            namespace: VariableNamespace::new(instance.num_steps(), instance.num_users()),
            assertions: vec![],
            diagnostics: vec![],
            constraint: ConstraintIndex::new(0),
        }
    }

    pub(crate) fn mode(&self) -> EncodingMode {
        self.mode
    }

    pub(crate) fn options(&self) -> SemanticOptions {
        self.options
    }

    /// Attributes the following assertions to `constraint`.
    pub(crate) fn set_constraint(&mut self, constraint: ConstraintIndex) {
        self.constraint = constraint;
    }

    /// The constraint currently being encoded.
    pub(crate) fn constraint(&self) -> ConstraintIndex {
        self.constraint
    }

    /// The users which may perform `step`, in increasing order.
    pub(crate) fn domain(&self, step: StepId) -> &'a [UserId] {
        let domains: &'a KeyedVec<StepId, Vec<UserId>> = self.domains;
        &domains[step]
    }

    pub(crate) fn in_domain(&self, step: StepId, user: UserId) -> bool {
        self.domain(step).binary_search(&user).is_ok()
    }

    /// The users which may perform at least one of `steps`, in increasing order.
    pub(crate) fn participants(&self, steps: &[StepId]) -> Vec<UserId> {
        steps
            .iter()
            .flat_map(|&step| self.domain(step).iter().copied())
            .sorted()
            .dedup()
            .collect()
    }

    /// The decision variable of `step` and `user`, or [`None`] if `user` is not in the domain
    /// of `step`.
    pub(crate) fn decision(&self, step: StepId, user: UserId) -> Option<BoolVar> {
        self.namespace.get_decision_var(step, user)
    }

    pub(crate) fn declare_decision(
        &mut self,
        step: StepId,
        user: UserId,
    ) -> Result<BoolVar, EncodingError> {
        Ok(self.namespace.decision_var(step, user)?)
    }

    /// Returns the auxiliary variable for `(kind, key)` together with whether it was allocated by
    /// this call.
    pub(crate) fn auxiliary(
        &mut self,
        kind: AuxKind,
        key: AuxKey,
    ) -> Result<(BoolVar, bool), EncodingError> {
        let is_new = self.namespace.get_auxiliary_var(kind, key).is_none();
        let variable = self.namespace.auxiliary_var(kind, key)?;
        Ok((variable, is_new))
    }

    /// Adds `Σ_u x[step, u] = 1` over the given decision variables.
    pub(crate) fn add_exactly_one(&mut self, step: StepId, decisions: &[BoolVar]) {
        self.assertions.push(Assertion {
            origin: AssertionOrigin::ExactlyOne(step),
            formula: Formula::Linear(Linear {
                terms: decisions.iter().map(|&decision| (1, decision)).collect(),
                comparison: Comparison::Equal,
                bound: 1,
            }),
        });
    }

    pub(crate) fn add_clause(&mut self, literals: impl IntoIterator<Item = Literal>) {
        let literals = literals.into_iter().unique().collect();
        self.push(Formula::Clause(literals));
    }

    pub(crate) fn add_linear(
        &mut self,
        terms: Vec<(i64, BoolVar)>,
        comparison: Comparison,
        bound: i64,
    ) {
        self.push(Formula::Linear(Linear {
            terms,
            comparison,
            bound,
        }));
    }

    pub(crate) fn add_relation(&mut self, relation: Relation) {
        self.push(Formula::Relation(relation));
    }

    pub(crate) fn diagnose(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn unsupported(&self, kind: ConstraintKind) -> EncodingError {
        EncodingError::UnsupportedConstraintInMode {
            constraint: self.constraint(),
            kind,
            mode: self.mode,
        }
    }

    /// The variable which is true exactly when `first` and `second` are performed by the same
    /// user. Its definition is added the first time it is requested.
    pub(crate) fn same_user(
        &mut self,
        first: StepId,
        second: StepId,
    ) -> Result<BoolVar, EncodingError> {
        let (first, second) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };

        let (same, is_new) = self.auxiliary(AuxKind::SameUser, AuxKey::StepPair(first, second))?;
        if !is_new {
            return Ok(same);
        }

        for &user in self.domain(first) {
            let Some(x_first) = self.decision(first, user) else {
                continue;
            };
            match self.decision(second, user) {
                Some(x_second) => {
                    self.add_clause([!Literal::from(x_first), !Literal::from(x_second), same.into()]);
                    self.add_clause([!Literal::from(same), !Literal::from(x_first), x_second.into()]);
                }
                None => self.add_clause([!Literal::from(same), !Literal::from(x_first)]),
            }
        }

        Ok(same)
    }

    /// The variable which is true exactly when `user` performs one of `steps`, owned by the
    /// current constraint.
    pub(crate) fn participation(
        &mut self,
        steps: &[StepId],
        user: UserId,
    ) -> Result<BoolVar, EncodingError> {
        let key = AuxKey::User(self.constraint(), user);
        let (participates, is_new) = self.auxiliary(AuxKind::UserIndicator, key)?;
        if !is_new {
            return Ok(participates);
        }

        let decisions = steps
            .iter()
            .filter_map(|&step| self.decision(step, user))
            .collect::<Vec<_>>();

        for &decision in &decisions {
            self.add_clause([!Literal::from(decision), participates.into()]);
        }
        self.add_clause(
            std::iter::once(!Literal::from(participates))
                .chain(decisions.iter().map(|&decision| Literal::from(decision))),
        );

        Ok(participates)
    }

    pub(crate) fn finish(self) -> (VariableNamespace, Vec<Assertion>, Vec<Diagnostic>) {
        (self.namespace, self.assertions, self.diagnostics)
    }

    fn push(&mut self, formula: Formula) {
        self.assertions.push(Assertion {
            origin: AssertionOrigin::Constraint(self.constraint),
            formula,
        });
    }
}
