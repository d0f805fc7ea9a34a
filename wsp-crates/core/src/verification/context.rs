use super::Violation;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::containers::KeyedVec;
use crate::instance::Instance;
use crate::options::SemanticOptions;

/// A candidate assignment resolved to at most one in-range user per step, as seen by the
/// verification predicates of the constraints.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EvaluationContext<'a> {
    instance: &'a Instance,
    options: SemanticOptions,
    domains: &'a KeyedVec<StepId, Vec<UserId>>,
    users: &'a KeyedVec<StepId, Option<UserId>>,
}

impl<'a> EvaluationContext<'a> {
    pub(crate) fn new(
        instance: &'a Instance,
        options: SemanticOptions,
        domains: &'a KeyedVec<StepId, Vec<UserId>>,
        users: &'a KeyedVec<StepId, Option<UserId>>,
    ) -> EvaluationContext<'a> {
        EvaluationContext {
            instance,
            options,
            domains,
            users,
        }
    }

    pub(crate) fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub(crate) fn options(&self) -> SemanticOptions {
        self.options
    }

    /// The users which may perform `step` under the active constraints, in increasing order.
    pub(crate) fn domain(&self, step: StepId) -> &'a [UserId] {
        let domains: &'a KeyedVec<StepId, Vec<UserId>> = self.domains;
        &domains[step]
    }

    /// The unique in-range user of `step`, if there is one.
    pub(crate) fn user_of(&self, step: StepId) -> Option<UserId> {
        self.users[step]
    }

    /// The steps of the assignment which have a unique in-range user.
    pub(crate) fn resolved_steps(&self) -> impl Iterator<Item = (StepId, UserId)> + 'a {
        let users: &'a KeyedVec<StepId, Option<UserId>> = self.users;
        users
            .iter_keyed()
            .filter_map(|(step, user)| user.map(|user| (step, user)))
    }

    /// The users of `steps` in scope order.
    ///
    /// Fails with [`Violation::UnresolvedSteps`] naming the steps without a unique in-range user.
    pub(crate) fn resolve(&self, steps: &[StepId]) -> Result<Vec<UserId>, Violation> {
        let unresolved = steps
            .iter()
            .copied()
            .filter(|&step| self.user_of(step).is_none())
            .collect::<Vec<_>>();

        if !unresolved.is_empty() {
            return Err(Violation::UnresolvedSteps { steps: unresolved });
        }

        Ok(steps.iter().filter_map(|&step| self.user_of(step)).collect())
    }

    /// The distinct users of `steps`, in increasing order.
    pub(crate) fn distinct_users(&self, steps: &[StepId]) -> Result<Vec<UserId>, Violation> {
        let mut users = self.resolve(steps)?;
        users.sort();
        users.dedup();
        Ok(users)
    }
}
