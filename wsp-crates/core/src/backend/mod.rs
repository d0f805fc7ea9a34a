//! The contract between compiled models and the engines solving them.
mod exhaustive;

use std::fmt::Display;

pub use exhaustive::*;

use crate::basic_types::Assignment;
use crate::encoding::EncodingMode;
use crate::encoding::EncodingModel;
use crate::termination::TerminationCondition;

/// The answer of a backend for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendResult {
    Satisfiable(Assignment),
    Unsatisfiable {
        /// A human readable explanation, if the backend has one.
        diagnostic: Option<String>,
    },
    /// The backend stopped before reaching a conclusion.
    Unknown,
}

/// An engine which solves [`EncodingModel`]s.
///
/// A backend owns its resources; it polls the given [`TerminationCondition`] and reports
/// [`BackendResult::Unknown`] when asked to stop.
pub trait SolverBackend {
    fn name(&self) -> &'static str;

    /// Whether models of `mode` can be solved.
    fn supports(&self, mode: EncodingMode) -> bool;

    fn solve(
        &mut self,
        model: &EncodingModel,
        termination: &mut dyn TerminationCondition,
    ) -> BackendResult;
}

/// The available backends, selected through configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BackendKind {
    /// Depth-first enumeration of step assignments; for testing and small instances.
    #[default]
    Exhaustive,
}

impl BackendKind {
    pub fn create(self) -> Box<dyn SolverBackend> {
        match self {
            BackendKind::Exhaustive => Box::new(ExhaustiveSearch::default()),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Exhaustive => write!(f, "exhaustive"),
        }
    }
}
