use super::TerminationCondition;

/// Stops as soon as either of two conditions stops.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<T1, T2> {
    first: T1,
    second: T2,
}

impl<T1, T2> Combinator<T1, T2> {
    pub fn new(first: T1, second: T2) -> Self {
        Combinator { first, second }
    }
}

impl<T1: TerminationCondition, T2: TerminationCondition> TerminationCondition
    for Combinator<T1, T2>
{
    fn should_stop(&mut self) -> bool {
        self.first.should_stop() || self.second.should_stop()
    }

    fn decision_has_been_made(&mut self) {
        self.first.decision_has_been_made();
        self.second.decision_has_been_made();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::DecisionBudget;
    use crate::termination::Indefinite;

    #[test]
    fn decisions_reach_both_conditions() {
        let mut combinator = Combinator::new(DecisionBudget::new(2), DecisionBudget::new(5));

        combinator.decision_has_been_made();
        assert!(!combinator.should_stop());

        combinator.decision_has_been_made();
        assert!(combinator.should_stop());
    }

    #[test]
    fn absent_condition_never_stops() {
        let mut combinator = Combinator::new(Indefinite, None::<DecisionBudget>);

        combinator.decision_has_been_made();
        assert!(!combinator.should_stop());
    }
}
