use std::fmt::Display;

use super::StepId;
use super::UserId;

/// A candidate solution: a list of `(step, user)` pairs.
///
/// An assignment is not required to be total, unique per step or in range; the verifier reports
/// these defects as structural violations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Assignment {
    pairs: Vec<(StepId, UserId)>,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment::default()
    }

    /// Creates the assignment which gives step `i + 1` to the `i`-th user of the iterator.
    pub fn from_users(users: impl IntoIterator<Item = UserId>) -> Assignment {
        users
            .into_iter()
            .enumerate()
            .map(|(index, user)| (StepId::new(index as u32 + 1), user))
            .collect()
    }

    pub fn assign(&mut self, step: StepId, user: UserId) {
        self.pairs.push((step, user));
    }

    pub fn pairs(&self) -> &[(StepId, UserId)] {
        &self.pairs
    }

    /// The first user assigned to `step`, if any.
    pub fn user_of(&self, step: StepId) -> Option<UserId> {
        self.pairs
            .iter()
            .find(|(assigned, _)| *assigned == step)
            .map(|&(_, user)| user)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(StepId, UserId)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (StepId, UserId)>>(iter: T) -> Self {
        Assignment {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (position, (step, user)) in self.pairs.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{step} -> {user}")?;
        }
        Ok(())
    }
}
