use std::fmt::Display;

use crate::containers::StorageKey;

/// A step of the workflow. Steps are numbered densely from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepId {
    id: u32,
}

impl StepId {
    pub const fn new(id: u32) -> StepId {
        StepId { id }
    }

    pub const fn id(self) -> u32 {
        self.id
    }
}

impl StorageKey for StepId {
    fn index(&self) -> usize {
        self.id as usize - 1
    }

    fn create_from_index(index: usize) -> Self {
        StepId::new(index as u32 + 1)
    }
}

impl Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.id)
    }
}

/// A user who can be assigned to steps. Users are numbered densely from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId {
    id: u32,
}

impl UserId {
    pub const fn new(id: u32) -> UserId {
        UserId { id }
    }

    pub const fn id(self) -> u32 {
        self.id
    }
}

impl StorageKey for UserId {
    fn index(&self) -> usize {
        self.id as usize - 1
    }

    fn create_from_index(index: usize) -> Self {
        UserId::new(index as u32 + 1)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "u{}", self.id)
    }
}

/// The position of a constraint in the constraint list of an instance, starting at 0.
///
/// It is displayed 1-based, matching the line order of an instance file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintIndex {
    index: u32,
}

impl ConstraintIndex {
    pub const fn new(index: u32) -> ConstraintIndex {
        ConstraintIndex { index }
    }
}

impl StorageKey for ConstraintIndex {
    fn index(&self) -> usize {
        self.index as usize
    }

    fn create_from_index(index: usize) -> Self {
        ConstraintIndex {
            index: index as u32,
        }
    }
}

impl Display for ConstraintIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index + 1)
    }
}

/// Formats a list of identifiers as `{a, b, c}`.
pub(crate) fn format_set<T: Display>(items: &[T]) -> String {
    let inner = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{inner}}}")
}
