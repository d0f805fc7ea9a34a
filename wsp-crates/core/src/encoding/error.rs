use thiserror::Error;

use super::EncodingMode;
use crate::basic_types::ConstraintIndex;
use crate::basic_types::InvalidReference;
use crate::constraints::ConstraintKind;

/// Errors which abort the compilation of an instance.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    #[error("constraint {constraint} ({kind}) cannot be expressed in {mode} mode")]
    UnsupportedConstraintInMode {
        constraint: ConstraintIndex,
        kind: ConstraintKind,
        mode: EncodingMode,
    },
    #[error(transparent)]
    InvalidReference(#[from] InvalidReference),
}
