//! Independent checking of candidate assignments against an instance.
//!
//! Verification does not use any encoding: every constraint checks itself directly against the
//! assigned users, which makes the verifier the reference for all encodings and backends.
mod context;
mod report;

pub(crate) use context::*;
use enumset::EnumSet;
use log::info;
pub use report::*;

use crate::basic_types::Assignment;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::constraints::ConstraintKind;
use crate::containers::KeyedVec;
use crate::instance::Instance;
use crate::options::SemanticOptions;
use crate::options::UnlistedUserPolicy;

/// Verifies `assignment` with the default [`SemanticOptions`].
///
/// See [`verify_with_options`].
pub fn verify(
    instance: &Instance,
    assignment: &Assignment,
    active: EnumSet<ConstraintKind>,
) -> VerificationReport {
    verify_with_options(instance, assignment, active, SemanticOptions::default())
}

/// Checks `assignment` against the structure of `instance` and every constraint whose kind is in
/// `active`.
///
/// The report starts with the structural outcome, followed by one outcome per active constraint
/// in instance order and, under the closed-world policy, the outcome for unlisted users.
pub fn verify_with_options(
    instance: &Instance,
    assignment: &Assignment,
    active: EnumSet<ConstraintKind>,
    options: SemanticOptions,
) -> VerificationReport {
    let (structure, users) = check_structure(instance, assignment);
    let domains = instance.domains(active, options);
    let context = EvaluationContext::new(instance, options, &domains, &users);

    let mut outcomes = vec![structure];
    for (index, constraint) in instance.constraints() {
        if !active.contains(constraint.kind()) {
            continue;
        }

        outcomes.push(ConstraintOutcome {
            reference: ConstraintReference::Constraint(index),
            kind: Some(constraint.kind()),
            violations: constraint.evaluate(&context),
        });
    }

    if active.contains(ConstraintKind::Authorization)
        && options.unlisted_users == UnlistedUserPolicy::ClosedWorld
    {
        outcomes.push(check_unlisted_users(&context));
    }

    let report = VerificationReport::new(outcomes);
    info!(
        "verified {} checks, {} violated",
        report.outcomes().len(),
        report.num_violated()
    );
    report
}

/// Resolves every step to its unique in-range user and reports the steps for which that fails.
fn check_structure(
    instance: &Instance,
    assignment: &Assignment,
) -> (ConstraintOutcome, KeyedVec<StepId, Option<UserId>>) {
    let mut violations = vec![];
    let mut assigned: KeyedVec<StepId, Vec<UserId>> =
        KeyedVec::filled(instance.num_steps() as usize, vec![]);

    for &(step, user) in assignment.pairs() {
        if instance.contains_step(step) {
            assigned[step].push(user);
        } else {
            violations.push(Violation::StepOutOfRange { step, user });
        }
    }

    let mut users = KeyedVec::filled(instance.num_steps() as usize, None);
    for (step, candidates) in assigned.iter_keyed() {
        match candidates.as_slice() {
            [] => violations.push(Violation::MissingAssignment { step }),
            &[user] if instance.contains_user(user) => users[step] = Some(user),
            &[user] => violations.push(Violation::UserOutOfRange { step, user }),
            _ => violations.push(Violation::MultipleAssignments {
                step,
                users: candidates.clone(),
            }),
        }
    }

    let outcome = ConstraintOutcome {
        reference: ConstraintReference::Structure,
        kind: None,
        violations,
    };
    (outcome, users)
}

fn check_unlisted_users(context: &EvaluationContext<'_>) -> ConstraintOutcome {
    let instance = context.instance();
    let violations = context
        .resolved_steps()
        .filter(|&(_, user)| !instance.is_listed(user))
        .map(|(step, user)| Violation::Unauthorized { step, user })
        .collect();

    ConstraintOutcome {
        reference: ConstraintReference::UnlistedUsers,
        kind: Some(ConstraintKind::Authorization),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::ConstraintIndex;
    use crate::constraints::AtMostK;
    use crate::constraints::Authorization;
    use crate::constraints::SeparationOfDuty;
    use crate::instance::InstanceRecord;

    fn step(id: u32) -> StepId {
        StepId::new(id)
    }

    fn user(id: u32) -> UserId {
        UserId::new(id)
    }

    #[test]
    fn structural_defects_are_reported() {
        let instance = Instance::new(InstanceRecord::new(3, 2, vec![])).expect("valid instance");
        let assignment = Assignment::from_iter([
            (step(1), user(1)),
            (step(1), user(2)),
            (step(3), user(5)),
            (step(4), user(1)),
        ]);

        let report = verify(&instance, &assignment, ConstraintKind::all());

        assert!(!report.all_satisfied());
        assert_eq!(
            report.outcomes()[0].violations,
            vec![
                Violation::StepOutOfRange {
                    step: step(4),
                    user: user(1)
                },
                Violation::MultipleAssignments {
                    step: step(1),
                    users: vec![user(1), user(2)]
                },
                Violation::MissingAssignment { step: step(2) },
                Violation::UserOutOfRange {
                    step: step(3),
                    user: user(5)
                },
            ]
        );
    }

    #[test]
    fn constraints_over_unresolved_steps_are_not_judged() {
        let instance = Instance::new(InstanceRecord::new(
            2,
            2,
            vec![SeparationOfDuty::new(step(1), step(2)).into()],
        ))
        .expect("valid instance");

        let report = verify(
            &instance,
            &Assignment::from_iter([(step(1), user(1))]),
            ConstraintKind::all(),
        );

        assert_eq!(
            report
                .outcome_of(ConstraintIndex::new(0))
                .map(|outcome| outcome.violations.clone()),
            Some(vec![Violation::UnresolvedSteps {
                steps: vec![step(2)]
            }])
        );
    }

    #[test]
    fn at_most_k_violations_name_the_users() {
        let instance = Instance::new(InstanceRecord::new(
            3,
            3,
            vec![AtMostK::new(2, vec![step(1), step(2), step(3)]).into()],
        ))
        .expect("valid instance");

        let report = verify(
            &instance,
            &Assignment::from_users([user(3), user(1), user(2)]),
            ConstraintKind::all(),
        );

        assert_eq!(
            report.violations().collect::<Vec<_>>(),
            vec![&Violation::TooManyUsers {
                users: vec![user(1), user(2), user(3)],
                limit: 2
            }]
        );
    }

    #[test]
    fn closed_world_rejects_unlisted_users() {
        let instance = Instance::new(InstanceRecord::new(
            2,
            2,
            vec![Authorization::new(user(1), vec![step(1), step(2)]).into()],
        ))
        .expect("valid instance");
        let assignment = Assignment::from_users([user(1), user(2)]);
        let closed_world = SemanticOptions {
            unlisted_users: UnlistedUserPolicy::ClosedWorld,
            ..Default::default()
        };

        assert!(verify(&instance, &assignment, ConstraintKind::all()).all_satisfied());

        let report = verify_with_options(&instance, &assignment, ConstraintKind::all(), closed_world);
        let unlisted = report.outcomes().last().expect("closed world adds an outcome");
        assert_eq!(unlisted.reference, ConstraintReference::UnlistedUsers);
        assert_eq!(
            unlisted.violations,
            vec![Violation::Unauthorized {
                step: step(2),
                user: user(2)
            }]
        );
    }

    #[test]
    fn inactive_constraints_are_skipped() {
        let instance = Instance::new(InstanceRecord::new(
            2,
            1,
            vec![SeparationOfDuty::new(step(1), step(2)).into()],
        ))
        .expect("valid instance");
        let assignment = Assignment::from_users([user(1), user(1)]);

        assert!(!verify(&instance, &assignment, ConstraintKind::all()).all_satisfied());
        assert!(verify(&instance, &assignment, EnumSet::empty()).all_satisfied());
    }
}
