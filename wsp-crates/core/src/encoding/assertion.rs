use std::fmt::Display;
use std::ops::Not;

use super::BoolVar;
use crate::basic_types::format_set;
use crate::basic_types::ConstraintIndex;
use crate::basic_types::StepId;
use crate::basic_types::UserId;

/// A boolean variable or its negation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    variable: BoolVar,
    is_positive: bool,
}

impl Literal {
    pub fn positive(variable: BoolVar) -> Literal {
        Literal {
            variable,
            is_positive: true,
        }
    }

    pub fn negative(variable: BoolVar) -> Literal {
        Literal {
            variable,
            is_positive: false,
        }
    }

    pub fn variable(self) -> BoolVar {
        self.variable
    }

    pub fn is_positive(self) -> bool {
        self.is_positive
    }

    /// The truth value of the literal when its variable takes `value`.
    pub fn evaluate(self, value: bool) -> bool {
        value == self.is_positive
    }
}

impl From<BoolVar> for Literal {
    fn from(variable: BoolVar) -> Self {
        Literal::positive(variable)
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            variable: self.variable,
            is_positive: !self.is_positive,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_positive {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "-{}", self.variable)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    LessEqual,
    Equal,
    GreaterEqual,
}

impl Comparison {
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::LessEqual => lhs <= rhs,
            Comparison::Equal => lhs == rhs,
            Comparison::GreaterEqual => lhs >= rhs,
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::LessEqual => write!(f, "<="),
            Comparison::Equal => write!(f, "="),
            Comparison::GreaterEqual => write!(f, ">="),
        }
    }
}

/// A linear pseudo-boolean constraint `Σ weight * var <comparison> bound`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Linear {
    pub terms: Vec<(i64, BoolVar)>,
    pub comparison: Comparison,
    pub bound: i64,
}

impl Display for Linear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (position, (weight, variable)) in self.terms.iter().enumerate() {
            if position > 0 {
                write!(f, " ")?;
            }
            write!(f, "{weight:+} {variable}")?;
        }
        write!(f, " {} {}", self.comparison, self.bound)
    }
}

/// A relation over the finite-domain step variables of a constraint-satisfaction model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    NotEqual(StepId, StepId),
    Equal(StepId, StepId),
    /// At most `limit` distinct users over the steps.
    AtMostDistinct { steps: Vec<StepId>, limit: u32 },
    /// All users of the steps are members of one single group.
    WithinOneGroup {
        steps: Vec<StepId>,
        groups: Vec<Vec<UserId>>,
    },
    /// If `antecedent` takes one of `antecedent_users` then `consequent` takes one of
    /// `consequent_users`.
    Implication {
        antecedent: StepId,
        antecedent_users: Vec<UserId>,
        consequent: StepId,
        consequent_users: Vec<UserId>,
    },
}

impl Relation {
    /// The steps whose values decide the relation.
    pub fn steps(&self) -> Vec<StepId> {
        match self {
            Relation::NotEqual(first, second) | Relation::Equal(first, second) => {
                vec![*first, *second]
            }
            Relation::AtMostDistinct { steps, .. } | Relation::WithinOneGroup { steps, .. } => {
                steps.clone()
            }
            Relation::Implication {
                antecedent,
                consequent,
                ..
            } => vec![*antecedent, *consequent],
        }
    }

    /// Evaluates the relation; returns [`None`] if one of its steps has no user yet.
    pub fn holds(&self, user_of: impl Fn(StepId) -> Option<UserId>) -> Option<bool> {
        match self {
            Relation::NotEqual(first, second) => Some(user_of(*first)? != user_of(*second)?),
            Relation::Equal(first, second) => Some(user_of(*first)? == user_of(*second)?),
            Relation::AtMostDistinct { steps, limit } => {
                let mut users = steps
                    .iter()
                    .map(|&step| user_of(step))
                    .collect::<Option<Vec<_>>>()?;
                users.sort();
                users.dedup();
                Some(users.len() <= *limit as usize)
            }
            Relation::WithinOneGroup { steps, groups } => {
                let users = steps
                    .iter()
                    .map(|&step| user_of(step))
                    .collect::<Option<Vec<_>>>()?;
                Some(
                    groups
                        .iter()
                        .any(|group| users.iter().all(|user| group.contains(user))),
                )
            }
            Relation::Implication {
                antecedent,
                antecedent_users,
                consequent,
                consequent_users,
            } => {
                let antecedent_user = user_of(*antecedent)?;
                let consequent_user = user_of(*consequent)?;
                Some(
                    !antecedent_users.contains(&antecedent_user)
                        || consequent_users.contains(&consequent_user),
                )
            }
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::NotEqual(first, second) => write!(f, "{first} != {second}"),
            Relation::Equal(first, second) => write!(f, "{first} == {second}"),
            Relation::AtMostDistinct { steps, limit } => {
                write!(f, "at_most_distinct({}, {limit})", format_set(steps))
            }
            Relation::WithinOneGroup { steps, groups } => {
                let groups = groups
                    .iter()
                    .map(|group| format_set(group))
                    .collect::<Vec<_>>();
                write!(
                    f,
                    "within_one_group({}, [{}])",
                    format_set(steps),
                    groups.join(", ")
                )
            }
            Relation::Implication {
                antecedent,
                antecedent_users,
                consequent,
                consequent_users,
            } => write!(
                f,
                "{antecedent} in {} -> {consequent} in {}",
                format_set(antecedent_users),
                format_set(consequent_users)
            ),
        }
    }
}

/// The logical content of an [`Assertion`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Formula {
    Clause(Vec<Literal>),
    Linear(Linear),
    Relation(Relation),
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Formula::Clause(literals) => {
                if literals.is_empty() {
                    return write!(f, "false");
                }
                let literals = literals.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "{}", literals.join(" | "))
            }
            Formula::Linear(linear) => write!(f, "{linear}"),
            Formula::Relation(relation) => write!(f, "{relation}"),
        }
    }
}

/// What caused an [`Assertion`] to be part of a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssertionOrigin {
    /// The requirement that the step receives exactly one user.
    ExactlyOne(StepId),
    Constraint(ConstraintIndex),
}

impl Display for AssertionOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssertionOrigin::ExactlyOne(step) => write!(f, "exactly-one {step}"),
            AssertionOrigin::Constraint(index) => write!(f, "constraint {index}"),
        }
    }
}

/// A single formula of an [`EncodingModel`](super::EncodingModel), tagged with its origin.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assertion {
    pub origin: AssertionOrigin,
    pub formula: Formula,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u32) -> UserId {
        UserId::new(id)
    }

    #[test]
    fn negated_literals_flip_their_evaluation() {
        let literal = Literal::positive(BoolVar::new(0));

        assert!(literal.evaluate(true));
        assert!((!literal).evaluate(false));
        assert_eq!(!!literal, literal);
    }

    #[test]
    fn relations_are_undecided_until_their_steps_are_assigned() {
        let relation = Relation::NotEqual(StepId::new(1), StepId::new(2));

        assert_eq!(relation.holds(|_| None), None);
        assert_eq!(relation.holds(|_| Some(user(1))), Some(false));
    }

    #[test]
    fn implication_only_restricts_source_users() {
        let relation = Relation::Implication {
            antecedent: StepId::new(1),
            antecedent_users: vec![user(1)],
            consequent: StepId::new(2),
            consequent_users: vec![user(2)],
        };

        let holds_for = |first: u32, second: u32| {
            relation.holds(|step| Some(if step.id() == 1 { user(first) } else { user(second) }))
        };

        assert_eq!(holds_for(1, 2), Some(true));
        assert_eq!(holds_for(1, 3), Some(false));
        assert_eq!(holds_for(3, 3), Some(true));
    }
}
