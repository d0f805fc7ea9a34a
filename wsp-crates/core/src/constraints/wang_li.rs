use super::groups::encode_within_one_group;
use super::groups::within_one_group;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::encoding::AuxKind;
use crate::encoding::Diagnostic;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::options::DepartmentPool;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// If some department can cover every step of the scope, all steps are performed by members of
/// one single department. Otherwise the constraint has no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WangLi {
    pub steps: Vec<StepId>,
    pub departments: Vec<Vec<UserId>>,
}

impl WangLi {
    pub fn new(steps: Vec<StepId>, departments: Vec<Vec<UserId>>) -> WangLi {
        WangLi { steps, departments }
    }

    /// Whether some department has, for every step of the scope, a member in `pool(step)`.
    fn is_active<'a>(&self, pool: DepartmentPool, domain: impl Fn(StepId) -> &'a [UserId]) -> bool {
        match pool {
            DepartmentPool::Members => self.departments.iter().any(|department| !department.is_empty()),
            DepartmentPool::Authorized => self.departments.iter().any(|department| {
                self.steps.iter().all(|&step| {
                    domain(step)
                        .iter()
                        .any(|user| department.binary_search(user).is_ok())
                })
            }),
        }
    }

    pub(crate) fn encode(&self, context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        if !self.is_active(context.options().department_pool, |step| context.domain(step)) {
            context.diagnose(Diagnostic::InertWangLi {
                constraint: context.constraint(),
            });
            return Ok(());
        }

        encode_within_one_group(
            context,
            &self.steps,
            &self.departments,
            AuxKind::DepartmentSelector,
        )
    }

    pub(crate) fn evaluate(&self, context: &EvaluationContext<'_>) -> Vec<Violation> {
        if !self.is_active(context.options().department_pool, |step| context.domain(step)) {
            return vec![];
        }

        match context.distinct_users(&self.steps) {
            Ok(users) if !within_one_group(&users, &self.departments) => {
                vec![Violation::DepartmentsMixed { users }]
            }
            Ok(_) => vec![],
            Err(violation) => vec![violation],
        }
    }
}
