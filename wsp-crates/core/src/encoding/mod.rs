//! Translation of an [`Instance`](crate::instance::Instance) into one of the logical encodings.
//!
//! - [`EncodingMode::ConstraintSatisfaction`] keeps one finite-domain variable per step and
//!   expresses the constraints as [`Relation`]s.
//! - [`EncodingMode::PatternBased`] uses a boolean decision variable per (step, user) pair and
//!   expresses cardinality through "same user" pattern variables between steps.
//! - [`EncodingMode::UserDependent`] uses the same decision variables together with per-user
//!   participation indicators.
mod assertion;
mod compiler;
mod context;
mod diagnostic;
mod error;
mod evaluation;
mod model;
mod namespace;
mod opb;
mod statistics;

use std::fmt::Display;

pub use assertion::*;
pub use compiler::*;
pub(crate) use context::*;
pub use diagnostic::*;
pub use error::*;
pub(crate) use evaluation::*;
pub use model::*;
pub use namespace::*;
pub use opb::*;
pub use statistics::*;

/// The logical encoding an instance is compiled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EncodingMode {
    /// Finite-domain step variables and relations (CS).
    #[cfg_attr(feature = "clap", value(name = "cs"))]
    ConstraintSatisfaction,
    /// Pattern-based pseudo-boolean encoding (PBPB).
    #[cfg_attr(feature = "clap", value(name = "pbpb"))]
    PatternBased,
    /// User-dependent pseudo-boolean encoding (UDPB).
    #[cfg_attr(feature = "clap", value(name = "udpb"))]
    UserDependent,
}

impl EncodingMode {
    /// Whether the encoding consists of boolean variables only.
    pub fn is_pseudo_boolean(self) -> bool {
        !matches!(self, EncodingMode::ConstraintSatisfaction)
    }
}

impl Display for EncodingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingMode::ConstraintSatisfaction => write!(f, "CS"),
            EncodingMode::PatternBased => write!(f, "PBPB"),
            EncodingMode::UserDependent => write!(f, "UDPB"),
        }
    }
}
