use enumset::EnumSet;
use log::debug;

use super::Diagnostic;
use super::EncodingContext;
use super::EncodingError;
use super::EncodingMode;
use super::EncodingModel;
use super::StepVariable;
use crate::constraints::ConstraintKind;
use crate::containers::KeyedVec;
use crate::instance::Instance;
use crate::options::SemanticOptions;
use crate::wsp_assert_eq_simple;

/// Compiles `instance` into `mode` with the default [`SemanticOptions`].
///
/// See [`compile_with_options`].
pub fn compile(
    instance: &Instance,
    active: EnumSet<ConstraintKind>,
    mode: EncodingMode,
) -> Result<EncodingModel, EncodingError> {
    compile_with_options(instance, active, mode, SemanticOptions::default())
}

/// Compiles the constraints of `instance` whose kind is in `active` into an [`EncodingModel`].
///
/// The result only depends on the arguments: compiling twice gives equal models. Constraints are
/// encoded in instance order, and the model either contains all of them or an error is returned.
pub fn compile_with_options(
    instance: &Instance,
    active: EnumSet<ConstraintKind>,
    mode: EncodingMode,
    options: SemanticOptions,
) -> Result<EncodingModel, EncodingError> {
    debug!(
        "compiling {} constraints in {mode} mode",
        instance.num_constraints()
    );

    let domains = instance.domains(active, options);
    let mut context = EncodingContext::new(instance, options, mode, &domains);

    let mut steps = KeyedVec::default();
    for (step, domain) in domains.iter_keyed() {
        if domain.is_empty() {
            context.diagnose(Diagnostic::InfeasibleDomain { step });
        }

        let mut decisions = vec![];
        if mode.is_pseudo_boolean() {
            for &user in domain {
                decisions.push(context.declare_decision(step, user)?);
            }
            context.add_exactly_one(step, &decisions);
        }

        let _ = steps.push(StepVariable {
            step,
            domain: domain.clone(),
            decisions,
        });
    }

    for (index, constraint) in instance.constraints() {
        if !active.contains(constraint.kind()) {
            continue;
        }
        context.set_constraint(index);
        constraint.encode(&mut context)?;
    }

    wsp_assert_eq_simple!(steps.len(), instance.num_steps() as usize);
    let (namespace, assertions, diagnostics) = context.finish();
    let model = EncodingModel::new(
        mode,
        instance.num_users(),
        steps,
        namespace.into_origins(),
        assertions,
        diagnostics,
    );
    debug!(
        "compiled {} variables and {} assertions",
        model.num_variables(),
        model.assertions().len()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::ConstraintIndex;
    use crate::basic_types::StepId;
    use crate::basic_types::UserId;
    use crate::constraints::Authorization;
    use crate::constraints::BindingOfDuty;
    use crate::constraints::SeparationOfDuty;
    use crate::constraints::SuperUserAtLeast;
    use crate::constraints::WangLi;
    use crate::encoding::AssertionOrigin;
    use crate::encoding::Formula;
    use crate::instance::InstanceRecord;

    fn step(id: u32) -> StepId {
        StepId::new(id)
    }

    fn user(id: u32) -> UserId {
        UserId::new(id)
    }

    #[test]
    fn without_constraints_only_exactly_one_is_asserted() {
        let instance = Instance::new(InstanceRecord::new(2, 3, vec![])).expect("valid instance");

        let model = compile(&instance, ConstraintKind::all(), EncodingMode::PatternBased)
            .expect("compiles");

        assert_eq!(model.num_variables(), 6);
        assert_eq!(model.assertions().len(), 2);
        assert!(model
            .assertions()
            .iter()
            .all(|assertion| matches!(assertion.origin, AssertionOrigin::ExactlyOne(_))));
    }

    #[test]
    fn super_user_constraints_are_rejected_in_cs() {
        let instance = Instance::new(InstanceRecord::new(
            2,
            2,
            vec![
                SeparationOfDuty::new(step(1), step(2)).into(),
                SuperUserAtLeast::new(2, vec![step(1), step(2)], vec![user(1)]).into(),
            ],
        ))
        .expect("valid instance");

        let result = compile(
            &instance,
            ConstraintKind::all(),
            EncodingMode::ConstraintSatisfaction,
        );

        assert_eq!(
            result,
            Err(EncodingError::UnsupportedConstraintInMode {
                constraint: ConstraintIndex::new(1),
                kind: ConstraintKind::SuperUserAtLeast,
                mode: EncodingMode::ConstraintSatisfaction,
            })
        );
    }

    #[test]
    fn inactive_super_user_constraints_compile_in_cs() {
        let instance = Instance::new(InstanceRecord::new(
            1,
            1,
            vec![SuperUserAtLeast::new(2, vec![step(1)], vec![user(1)]).into()],
        ))
        .expect("valid instance");

        let mut active = ConstraintKind::all();
        let _ = active.remove(ConstraintKind::SuperUserAtLeast);

        assert!(compile(&instance, active, EncodingMode::ConstraintSatisfaction).is_ok());
    }

    #[test]
    fn empty_domains_are_diagnosed() {
        let instance = Instance::new(InstanceRecord::new(
            2,
            1,
            vec![Authorization::new(user(1), vec![step(1)]).into()],
        ))
        .expect("valid instance");

        let model = compile(&instance, ConstraintKind::all(), EncodingMode::UserDependent)
            .expect("compiles");

        assert_eq!(
            model.diagnostics(),
            &[Diagnostic::InfeasibleDomain { step: step(2) }]
        );
    }

    #[test]
    fn binding_of_a_step_to_itself_emits_nothing() {
        let instance = Instance::new(InstanceRecord::new(
            1,
            2,
            vec![BindingOfDuty::new(step(1), step(1)).into()],
        ))
        .expect("valid instance");

        for mode in [
            EncodingMode::ConstraintSatisfaction,
            EncodingMode::PatternBased,
            EncodingMode::UserDependent,
        ] {
            let model = compile(&instance, ConstraintKind::all(), mode).expect("compiles");
            assert!(model
                .assertions()
                .iter()
                .all(|assertion| matches!(assertion.origin, AssertionOrigin::ExactlyOne(_))));
        }
    }

    #[test]
    fn separating_a_step_from_itself_gives_unit_clauses() {
        let instance = Instance::new(InstanceRecord::new(
            1,
            2,
            vec![SeparationOfDuty::new(step(1), step(1)).into()],
        ))
        .expect("valid instance");

        let model =
            compile(&instance, ConstraintKind::all(), EncodingMode::PatternBased).expect("compiles");

        let unit_clauses = model
            .assertions()
            .iter()
            .filter(|assertion| matches!(&assertion.formula, Formula::Clause(literals) if literals.len() == 1))
            .count();
        assert_eq!(unit_clauses, 2);
    }

    #[test]
    fn uncoverable_wang_li_is_inert() {
        let instance = Instance::new(InstanceRecord::new(
            2,
            2,
            vec![
                Authorization::new(user(1), vec![step(1)]).into(),
                Authorization::new(user(2), vec![step(2)]).into(),
                WangLi::new(vec![step(1), step(2)], vec![vec![user(1)], vec![user(2)]]).into(),
            ],
        ))
        .expect("valid instance");

        let model =
            compile(&instance, ConstraintKind::all(), EncodingMode::PatternBased).expect("compiles");

        assert_eq!(
            model.diagnostics(),
            &[Diagnostic::InertWangLi {
                constraint: ConstraintIndex::new(2)
            }]
        );
        assert_eq!(model.assertions().len(), 2);
    }
}
