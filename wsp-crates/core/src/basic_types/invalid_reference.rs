use thiserror::Error;

use super::StepId;
use super::UserId;

/// A step or user identifier which lies outside the range declared by the instance.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReference {
    #[error("step {step} is not declared; the instance has {num_steps} steps")]
    Step { step: StepId, num_steps: u32 },
    #[error("user {user} is not declared; the instance has {num_users} users")]
    User { user: UserId, num_users: u32 },
}
