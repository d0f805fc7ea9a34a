use thiserror::Error;

use crate::basic_types::ConstraintIndex;
use crate::basic_types::StepId;
use crate::basic_types::UserId;

/// Reasons for rejecting an [`InstanceRecord`](super::InstanceRecord).
///
/// Constraint indices refer to the position in the record, before authorizations are merged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedInstance {
    #[error("the instance declares no steps")]
    NoSteps,
    #[error("the instance declares no users")]
    NoUsers,
    #[error("{declared} constraints were declared but {found} were given")]
    ConstraintCountMismatch { declared: u32, found: usize },
    #[error("constraint {constraint} references step {step}, which is not declared")]
    UndeclaredStep {
        constraint: ConstraintIndex,
        step: StepId,
    },
    #[error("constraint {constraint} references user {user}, which is not declared")]
    UndeclaredUser {
        constraint: ConstraintIndex,
        user: UserId,
    },
    #[error("constraint {constraint} has an empty scope")]
    EmptyScope { constraint: ConstraintIndex },
    #[error("constraint {constraint} allows at most 0 users")]
    ZeroLimit { constraint: ConstraintIndex },
    #[error("constraint {constraint} lists no groups")]
    NoGroups { constraint: ConstraintIndex },
    #[error("group {} of constraint {constraint} is empty", group + 1)]
    EmptyGroup {
        constraint: ConstraintIndex,
        group: usize,
    },
}
