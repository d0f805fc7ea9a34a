//! Conditions polled by a backend while it searches, telling it to give up and report an unknown
//! result. Backends own cancellation: the core never stops a search on its own.
mod combinator;
mod decision_budget;
mod indefinite;
mod time_budget;

pub use combinator::*;
pub use decision_budget::*;
pub use indefinite::*;
pub use time_budget::*;

/// Decides when a search should stop before reaching a conclusion.
pub trait TerminationCondition {
    /// Returns `true` when the search should stop.
    fn should_stop(&mut self) -> bool;

    /// Called whenever the search assigns a user to a step.
    fn decision_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().is_some_and(TerminationCondition::should_stop)
    }

    fn decision_has_been_made(&mut self) {
        if let Some(condition) = self {
            condition.decision_has_been_made();
        }
    }
}
