//! The validated, immutable model of a workflow satisfiability instance.
mod error;

use enum_map::EnumMap;
use enumset::EnumSet;
pub use error::*;

use crate::basic_types::ConstraintIndex;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::constraints::Authorization;
use crate::constraints::Constraint;
use crate::constraints::ConstraintKind;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::options::SemanticOptions;
use crate::options::UnlistedUserPolicy;

/// An instance as delivered by a reader, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceRecord {
    pub step_count: u32,
    pub user_count: u32,
    pub constraint_count: u32,
    pub constraints: Vec<Constraint>,
}

impl InstanceRecord {
    /// A record whose declared constraint count matches the given constraints.
    pub fn new(step_count: u32, user_count: u32, constraints: Vec<Constraint>) -> InstanceRecord {
        InstanceRecord {
            step_count,
            user_count,
            constraint_count: constraints.len() as u32,
            constraints,
        }
    }
}

/// Steps `1..=N`, users `1..=M` and the constraints over them.
///
/// An instance is immutable once built; all constraints only reference declared steps and users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    num_steps: u32,
    num_users: u32,
    constraints: KeyedVec<ConstraintIndex, Constraint>,
    /// For every user, the steps they may perform, or [`None`] if no authorization mentions
    /// them.
    authorizations: KeyedVec<UserId, Option<Vec<StepId>>>,
}

impl Instance {
    /// Validates `record` and builds the instance.
    ///
    /// Authorization entries of the same user are merged into the position of the first one.
    pub fn new(record: InstanceRecord) -> Result<Instance, MalformedInstance> {
        if record.step_count == 0 {
            return Err(MalformedInstance::NoSteps);
        }
        if record.user_count == 0 {
            return Err(MalformedInstance::NoUsers);
        }
        if record.constraint_count as usize != record.constraints.len() {
            return Err(MalformedInstance::ConstraintCountMismatch {
                declared: record.constraint_count,
                found: record.constraints.len(),
            });
        }

        let mut authorizations: KeyedVec<UserId, Option<Vec<StepId>>> =
            KeyedVec::filled(record.user_count as usize, None);
        let mut authorization_positions: KeyedVec<UserId, Option<usize>> =
            KeyedVec::filled(record.user_count as usize, None);
        let mut constraints: Vec<Constraint> = Vec::with_capacity(record.constraints.len());

        for (position, mut constraint) in record.constraints.into_iter().enumerate() {
            constraint.validate(
                ConstraintIndex::create_from_index(position),
                record.step_count,
                record.user_count,
            )?;
            constraint.normalise();

            let Constraint::Authorization(authorization) = &constraint else {
                constraints.push(constraint);
                continue;
            };

            let user = authorization.user;
            let steps = authorizations[user].get_or_insert_with(Vec::new);
            steps.extend(authorization.steps.iter().copied());
            steps.sort();
            steps.dedup();

            match authorization_positions[user] {
                Some(merged) => {
                    constraints[merged] =
                        Authorization::new(user, steps.clone()).into();
                }
                None => {
                    authorization_positions[user] = Some(constraints.len());
                    constraints.push(constraint);
                }
            }
        }

        let instance = Instance {
            num_steps: record.step_count,
            num_users: record.user_count,
            constraints: constraints.into_iter().collect(),
            authorizations,
        };
        log::debug!(
            "built an instance with {} steps, {} users and {} constraints",
            instance.num_steps,
            instance.num_users,
            instance.constraints.len()
        );
        Ok(instance)
    }

    pub fn num_steps(&self) -> u32 {
        self.num_steps
    }

    pub fn num_users(&self) -> u32 {
        self.num_users
    }

    pub fn steps(&self) -> impl Iterator<Item = StepId> {
        (1..=self.num_steps).map(StepId::new)
    }

    pub fn users(&self) -> impl Iterator<Item = UserId> {
        (1..=self.num_users).map(UserId::new)
    }

    pub fn contains_step(&self, step: StepId) -> bool {
        (1..=self.num_steps).contains(&step.id())
    }

    pub fn contains_user(&self, user: UserId) -> bool {
        (1..=self.num_users).contains(&user.id())
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// The constraints in instance order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintIndex, &Constraint)> + '_ {
        self.constraints.iter_keyed()
    }

    pub fn constraint(&self, index: ConstraintIndex) -> Option<&Constraint> {
        self.constraints.get(index)
    }

    /// Whether some authorization entry mentions `user`.
    pub fn is_listed(&self, user: UserId) -> bool {
        self.contains_user(user) && self.authorizations[user].is_some()
    }

    pub fn is_authorized(&self, user: UserId, step: StepId, policy: UnlistedUserPolicy) -> bool {
        if !self.contains_user(user) {
            return false;
        }
        match (&self.authorizations[user], policy) {
            (Some(steps), _) => steps.binary_search(&step).is_ok(),
            (None, UnlistedUserPolicy::OpenWorld) => true,
            (None, UnlistedUserPolicy::ClosedWorld) => false,
        }
    }

    /// The users authorized for `step`, in increasing order.
    pub fn authorized_users(&self, step: StepId, policy: UnlistedUserPolicy) -> Vec<UserId> {
        self.users()
            .filter(|&user| self.is_authorized(user, step, policy))
            .collect()
    }

    /// The domain of every step: its authorized users if authorizations are active, all users
    /// otherwise.
    pub fn domains(
        &self,
        active: EnumSet<ConstraintKind>,
        options: SemanticOptions,
    ) -> KeyedVec<StepId, Vec<UserId>> {
        self.steps()
            .map(|step| {
                if active.contains(ConstraintKind::Authorization) {
                    self.authorized_users(step, options.unlisted_users)
                } else {
                    self.users().collect()
                }
            })
            .collect()
    }

    /// The number of constraints of every kind.
    pub fn constraint_counts(&self) -> EnumMap<ConstraintKind, usize> {
        let mut counts = EnumMap::default();
        for constraint in self.constraints.iter() {
            counts[constraint.kind()] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::SeparationOfDuty;

    fn step(id: u32) -> StepId {
        StepId::new(id)
    }

    fn user(id: u32) -> UserId {
        UserId::new(id)
    }

    #[test]
    fn authorizations_of_one_user_are_merged() {
        let instance = Instance::new(InstanceRecord::new(
            3,
            2,
            vec![
                Authorization::new(user(1), vec![step(2)]).into(),
                SeparationOfDuty::new(step(1), step(2)).into(),
                Authorization::new(user(1), vec![step(3), step(1)]).into(),
            ],
        ))
        .expect("valid instance");

        assert_eq!(instance.num_constraints(), 2);
        assert_eq!(
            instance.constraint(ConstraintIndex::new(0)),
            Some(&Authorization::new(user(1), vec![step(1), step(2), step(3)]).into())
        );
        assert_eq!(instance.constraint_counts()[ConstraintKind::Authorization], 1);
    }

    #[test]
    fn unlisted_users_follow_the_policy() {
        let instance = Instance::new(InstanceRecord::new(
            2,
            2,
            vec![Authorization::new(user(1), vec![step(1)]).into()],
        ))
        .expect("valid instance");

        assert_eq!(
            instance.authorized_users(step(2), UnlistedUserPolicy::OpenWorld),
            vec![user(2)]
        );
        assert_eq!(
            instance.authorized_users(step(1), UnlistedUserPolicy::ClosedWorld),
            vec![user(1)]
        );
        assert!(instance
            .authorized_users(step(2), UnlistedUserPolicy::ClosedWorld)
            .is_empty());
    }

    #[test]
    fn domains_ignore_inactive_authorizations() {
        let instance = Instance::new(InstanceRecord::new(
            1,
            3,
            vec![Authorization::new(user(1), vec![]).into()],
        ))
        .expect("valid instance");

        let active = instance.domains(ConstraintKind::all(), SemanticOptions::default());
        let inactive = instance.domains(EnumSet::empty(), SemanticOptions::default());

        assert_eq!(active[step(1)], vec![user(2), user(3)]);
        assert_eq!(inactive[step(1)], vec![user(1), user(2), user(3)]);
    }

    #[test]
    fn mismatching_counts_are_rejected() {
        let record = InstanceRecord {
            step_count: 2,
            user_count: 2,
            constraint_count: 3,
            constraints: vec![SeparationOfDuty::new(step(1), step(2)).into()],
        };

        assert_eq!(
            Instance::new(record),
            Err(MalformedInstance::ConstraintCountMismatch {
                declared: 3,
                found: 1
            })
        );
    }

    #[test]
    fn empty_instances_are_rejected() {
        assert_eq!(
            Instance::new(InstanceRecord::new(0, 1, vec![])),
            Err(MalformedInstance::NoSteps)
        );
        assert_eq!(
            Instance::new(InstanceRecord::new(1, 0, vec![])),
            Err(MalformedInstance::NoUsers)
        );
    }
}
