//! The group-selection encoding shared by team and department constraints.
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::encoding::AuxKey;
use crate::encoding::AuxKind;
use crate::encoding::BoolVar;
use crate::encoding::Comparison;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::encoding::EncodingMode;
use crate::encoding::Literal;
use crate::encoding::Relation;

/// Encodes that every user performing one of `steps` belongs to one selected group.
pub(super) fn encode_within_one_group(
    context: &mut EncodingContext<'_>,
    steps: &[StepId],
    groups: &[Vec<UserId>],
    selector: AuxKind,
) -> Result<(), EncodingError> {
    if context.mode() == EncodingMode::ConstraintSatisfaction {
        context.add_relation(Relation::WithinOneGroup {
            steps: steps.to_vec(),
            groups: groups.to_vec(),
        });
        return Ok(());
    }

    let constraint = context.constraint();
    let mut selectors = vec![];
    for group in 0..groups.len() {
        let (variable, _) = context.auxiliary(selector, AuxKey::Group(constraint, group))?;
        selectors.push(variable);
    }
    context.add_linear(
        selectors.iter().map(|&selector| (1, selector)).collect(),
        Comparison::Equal,
        1,
    );

    let selectors_of = |user: UserId| {
        groups
            .iter()
            .zip(&selectors)
            .filter(|(group, _)| group.binary_search(&user).is_ok())
            .map(|(_, &selector)| Literal::from(selector))
            .collect::<Vec<_>>()
    };

    let mut premises: Vec<(BoolVar, UserId)> = vec![];
    match context.mode() {
        EncodingMode::PatternBased => {
            for &step in steps {
                for &user in context.domain(step) {
                    if let Some(decision) = context.decision(step, user) {
                        premises.push((decision, user));
                    }
                }
            }
        }
        EncodingMode::UserDependent => {
            for user in context.participants(steps) {
                premises.push((context.participation(steps, user)?, user));
            }
        }
        EncodingMode::ConstraintSatisfaction => {}
    }

    for (premise, user) in premises {
        context.add_clause(std::iter::once(!Literal::from(premise)).chain(selectors_of(user)));
    }

    Ok(())
}

/// Whether all of `users` are members of one of `groups`.
pub(super) fn within_one_group(users: &[UserId], groups: &[Vec<UserId>]) -> bool {
    groups
        .iter()
        .any(|group| users.iter().all(|user| group.binary_search(user).is_ok()))
}
