#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

//! Every encoding admits exactly the assignments which the verifier accepts.

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use wsp_core::backend::ExhaustiveSearch;
use wsp_core::basic_types::Assignment;
use wsp_core::basic_types::StepId;
use wsp_core::basic_types::UserId;
use wsp_core::compile_with_options;
use wsp_core::constraints::AssignmentDependent;
use wsp_core::constraints::AtMostK;
use wsp_core::constraints::Authorization;
use wsp_core::constraints::BindingOfDuty;
use wsp_core::constraints::Constraint;
use wsp_core::constraints::ConstraintKind;
use wsp_core::constraints::OneTeam;
use wsp_core::constraints::SeparationOfDuty;
use wsp_core::constraints::SuperUserAtLeast;
use wsp_core::constraints::WangLi;
use wsp_core::encoding::EncodingMode;
use wsp_core::enumset::EnumSet;
use wsp_core::instance::Instance;
use wsp_core::instance::InstanceRecord;
use wsp_core::options::DepartmentPool;
use wsp_core::options::SemanticOptions;
use wsp_core::options::UnlistedUserPolicy;
use wsp_core::termination::Indefinite;
use wsp_core::verify_with_options;

const NUM_STEPS: u32 = 4;
const NUM_USERS: u32 = 3;

fn random_steps(rng: &mut SmallRng) -> Vec<StepId> {
    let size = rng.gen_range(1..=NUM_STEPS);
    (0..size)
        .map(|_| StepId::new(rng.gen_range(1..=NUM_STEPS)))
        .collect()
}

fn random_users(rng: &mut SmallRng) -> Vec<UserId> {
    (1..=NUM_USERS)
        .filter(|_| rng.gen_bool(0.5))
        .map(UserId::new)
        .collect()
}

fn random_groups(rng: &mut SmallRng) -> Vec<Vec<UserId>> {
    let num_groups = rng.gen_range(1..=2);
    (0..num_groups)
        .map(|_| {
            let mut group = random_users(rng);
            if group.is_empty() {
                group.push(UserId::new(rng.gen_range(1..=NUM_USERS)));
            }
            group
        })
        .collect()
}

fn random_step(rng: &mut SmallRng) -> StepId {
    StepId::new(rng.gen_range(1..=NUM_STEPS))
}

fn random_constraint(rng: &mut SmallRng) -> Constraint {
    match rng.gen_range(0..8) {
        0 => Authorization::new(
            UserId::new(rng.gen_range(1..=NUM_USERS)),
            random_steps(rng),
        )
        .into(),
        1 => SeparationOfDuty::new(random_step(rng), random_step(rng)).into(),
        2 => BindingOfDuty::new(random_step(rng), random_step(rng)).into(),
        3 => AtMostK::new(rng.gen_range(1..=2), random_steps(rng)).into(),
        4 => OneTeam::new(random_steps(rng), random_groups(rng)).into(),
        5 => SuperUserAtLeast::new(
            rng.gen_range(0..=3),
            random_steps(rng),
            random_users(rng),
        )
        .into(),
        6 => WangLi::new(random_steps(rng), random_groups(rng)).into(),
        _ => AssignmentDependent::new(
            random_step(rng),
            random_step(rng),
            random_users(rng),
            random_users(rng),
        )
        .into(),
    }
}

fn random_instance(rng: &mut SmallRng) -> Instance {
    let num_constraints = rng.gen_range(1..=4);
    let constraints = (0..num_constraints)
        .map(|_| random_constraint(rng))
        .collect();
    Instance::new(InstanceRecord::new(NUM_STEPS, NUM_USERS, constraints)).expect("valid instance")
}

/// Every total assignment of users to the steps.
fn all_assignments() -> Vec<Assignment> {
    let mut assignments = vec![Assignment::new()];
    for step in 1..=NUM_STEPS {
        assignments = assignments
            .into_iter()
            .flat_map(|assignment| {
                (1..=NUM_USERS).map(move |user| {
                    let mut extended = assignment.clone();
                    extended.assign(StepId::new(step), UserId::new(user));
                    extended
                })
            })
            .collect();
    }
    assignments
}

fn modes_for(instance: &Instance) -> Vec<EncodingMode> {
    let has_super_user = instance
        .constraints()
        .any(|(_, constraint)| constraint.kind() == ConstraintKind::SuperUserAtLeast);

    let mut modes = vec![EncodingMode::PatternBased, EncodingMode::UserDependent];
    if !has_super_user {
        modes.push(EncodingMode::ConstraintSatisfaction);
    }
    modes
}

fn assert_equivalent(
    instance: &Instance,
    active: EnumSet<ConstraintKind>,
    options: SemanticOptions,
    assignments: &[Assignment],
) {
    for mode in modes_for(instance) {
        let model = compile_with_options(instance, active, mode, options).expect("compiles");

        let mut accepted = vec![];
        for assignment in assignments {
            let admitted = model.is_satisfied_by(assignment);
            let report = verify_with_options(instance, assignment, active, options);

            assert_eq!(
                admitted,
                report.all_satisfied(),
                "{mode} disagrees with the verifier on {assignment}\n{instance:?}\n{report}"
            );
            if admitted {
                accepted.push(assignment.clone());
            }
        }

        let enumeration =
            ExhaustiveSearch::default().enumerate(&model, usize::MAX, &mut Indefinite);
        assert!(enumeration.is_complete);
        assert_eq!(enumeration.solutions, accepted, "{mode}\n{instance:?}");
    }
}

#[test]
fn random_instances_agree_with_the_verifier() {
    let mut rng = SmallRng::seed_from_u64(42);
    let assignments = all_assignments();

    for _ in 0..60 {
        let instance = random_instance(&mut rng);
        assert_equivalent(
            &instance,
            ConstraintKind::all(),
            SemanticOptions::default(),
            &assignments,
        );
    }
}

#[test]
fn random_instances_agree_under_alternative_semantics() {
    let mut rng = SmallRng::seed_from_u64(7);
    let assignments = all_assignments();
    let options = SemanticOptions {
        unlisted_users: UnlistedUserPolicy::ClosedWorld,
        department_pool: DepartmentPool::Members,
    };

    for _ in 0..30 {
        let mut instance_constraints = vec![Authorization::new(
            UserId::new(1),
            (1..=NUM_STEPS).map(StepId::new).collect(),
        )
        .into()];
        instance_constraints.extend((0..3).map(|_| random_constraint(&mut rng)));
        let instance = Instance::new(InstanceRecord::new(
            NUM_STEPS,
            NUM_USERS,
            instance_constraints,
        ))
        .expect("valid instance");

        assert_equivalent(&instance, ConstraintKind::all(), options, &assignments);
    }
}

#[test]
fn inactive_kinds_are_ignored_by_both_sides() {
    let mut rng = SmallRng::seed_from_u64(1234);
    let assignments = all_assignments();

    for _ in 0..20 {
        let instance = random_instance(&mut rng);
        let mut active = ConstraintKind::all();
        let _ = active.remove(ConstraintKind::Authorization);
        let _ = active.remove(ConstraintKind::AtMostK);

        assert_equivalent(&instance, active, SemanticOptions::default(), &assignments);
    }
}

#[test]
fn partial_assignments_are_rejected_by_both_sides() {
    let instance = Instance::new(InstanceRecord::new(
        2,
        2,
        vec![SeparationOfDuty::new(StepId::new(1), StepId::new(2)).into()],
    ))
    .expect("valid instance");
    let partial = Assignment::from_users([UserId::new(1)]);

    for mode in modes_for(&instance) {
        let model = compile_with_options(
            &instance,
            ConstraintKind::all(),
            mode,
            SemanticOptions::default(),
        )
        .expect("compiles");
        assert!(!model.is_satisfied_by(&partial));
    }
    assert!(
        !verify_with_options(
            &instance,
            &partial,
            ConstraintKind::all(),
            SemanticOptions::default()
        )
        .all_satisfied()
    );
}
