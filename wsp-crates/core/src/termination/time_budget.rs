use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// Stops once a wall-clock budget, measured from construction, is used up.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    started_at: Instant,
    budget: Duration,
}

impl TimeBudget {
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            started_at: Instant::now(),
            budget,
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.started_at.elapsed() >= self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::Combinator;
    use crate::termination::DecisionBudget;

    #[test]
    fn an_empty_budget_stops_immediately() {
        let mut budget = TimeBudget::starting_now(Duration::ZERO);
        assert!(budget.should_stop());
    }

    #[test]
    fn combined_conditions_stop_when_one_stops() {
        let mut condition = Combinator::new(
            TimeBudget::starting_now(Duration::from_secs(3600)),
            DecisionBudget::new(1),
        );
        assert!(!condition.should_stop());

        condition.decision_has_been_made();
        assert!(condition.should_stop());
    }
}
