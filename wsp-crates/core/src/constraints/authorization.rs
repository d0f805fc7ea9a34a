use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// `user` may only perform the listed steps.
///
/// Authorizations shape the step domains of an encoding rather than adding assertions; several
/// entries for one user are merged when the instance is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub user: UserId,
    pub steps: Vec<StepId>,
}

impl Authorization {
    pub fn new(user: UserId, steps: Vec<StepId>) -> Authorization {
        Authorization { user, steps }
    }

    pub fn allows(&self, step: StepId) -> bool {
        self.steps.binary_search(&step).is_ok()
    }

    pub(crate) fn encode(&self, _context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        Ok(())
    }

    pub(crate) fn evaluate(&self, context: &EvaluationContext<'_>) -> Vec<Violation> {
        context
            .resolved_steps()
            .filter(|&(step, user)| user == self.user && !self.allows(step))
            .map(|(step, user)| Violation::Unauthorized { step, user })
            .collect()
    }
}
