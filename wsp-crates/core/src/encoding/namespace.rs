use std::fmt::Display;

use crate::basic_types::ConstraintIndex;
use crate::basic_types::InvalidReference;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// An opaque handle to a boolean variable of an encoding.
///
/// Handles are ordered by allocation and never alias within one [`VariableNamespace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoolVar {
    index: u32,
}

impl BoolVar {
    pub(crate) const fn new(index: u32) -> BoolVar {
        BoolVar { index }
    }
}

impl StorageKey for BoolVar {
    fn index(&self) -> usize {
        self.index as usize
    }

    fn create_from_index(index: usize) -> Self {
        BoolVar::new(index as u32)
    }
}

impl Display for BoolVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.index + 1)
    }
}

/// The families of auxiliary variables introduced by the encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuxKind {
    /// Two steps are assigned to the same user.
    SameUser,
    /// A step is assigned to a user not used by any earlier step of the scope.
    FirstOccurrence,
    /// A user performs at least one step of the scope.
    UserIndicator,
    TeamSelector,
    DepartmentSelector,
    /// The distinct-user threshold of a super-user constraint is reached.
    ThresholdIndicator,
    /// The source step of an assignment-dependent constraint takes a source user.
    SourceIndicator,
}

impl Display for AuxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuxKind::SameUser => "same",
            AuxKind::FirstOccurrence => "first",
            AuxKind::UserIndicator => "participates",
            AuxKind::TeamSelector => "team",
            AuxKind::DepartmentSelector => "department",
            AuxKind::ThresholdIndicator => "threshold",
            AuxKind::SourceIndicator => "source",
        };
        write!(f, "{name}")
    }
}

/// Identifies one auxiliary variable within its [`AuxKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuxKey {
    /// An ordered pair of steps; used by [`AuxKind::SameUser`], which does not depend on the
    /// constraint introducing it.
    StepPair(StepId, StepId),
    Constraint(ConstraintIndex),
    Step(ConstraintIndex, StepId),
    User(ConstraintIndex, UserId),
    Group(ConstraintIndex, usize),
}

impl Display for AuxKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuxKey::StepPair(first, second) => write!(f, "{first},{second}"),
            AuxKey::Constraint(constraint) => write!(f, "{constraint}"),
            AuxKey::Step(constraint, step) => write!(f, "{constraint},{step}"),
            AuxKey::User(constraint, user) => write!(f, "{constraint},{user}"),
            AuxKey::Group(constraint, group) => write!(f, "{constraint},g{}", group + 1),
        }
    }
}

/// What a variable of a model stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableOrigin {
    Decision { step: StepId, user: UserId },
    Auxiliary { kind: AuxKind, key: AuxKey },
}

impl Display for VariableOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableOrigin::Decision { step, user } => write!(f, "x[{step},{user}]"),
            VariableOrigin::Auxiliary { kind, key } => write!(f, "{kind}[{key}]"),
        }
    }
}

/// Hands out boolean variables for decisions and auxiliary concepts.
///
/// Requests for the same decision or the same `(kind, key)` pair always return the same
/// [`BoolVar`]; distinct requests never share one.
#[derive(Debug, Clone)]
pub struct VariableNamespace {
    num_steps: u32,
    num_users: u32,
    origins: KeyedVec<BoolVar, VariableOrigin>,
    decisions: HashMap<(StepId, UserId), BoolVar>,
    auxiliaries: HashMap<(AuxKind, AuxKey), BoolVar>,
}

impl VariableNamespace {
    pub fn new(num_steps: u32, num_users: u32) -> VariableNamespace {
        VariableNamespace {
            num_steps,
            num_users,
            origins: KeyedVec::default(),
            decisions: HashMap::default(),
            auxiliaries: HashMap::default(),
        }
    }

    /// The variable stating that `step` is performed by `user`.
    pub fn decision_var(&mut self, step: StepId, user: UserId) -> Result<BoolVar, InvalidReference> {
        self.check_step(step)?;
        self.check_user(user)?;

        if let Some(&variable) = self.decisions.get(&(step, user)) {
            return Ok(variable);
        }

        let variable = self.origins.push(VariableOrigin::Decision { step, user });
        let _ = self.decisions.insert((step, user), variable);
        Ok(variable)
    }

    pub fn get_decision_var(&self, step: StepId, user: UserId) -> Option<BoolVar> {
        self.decisions.get(&(step, user)).copied()
    }

    /// The auxiliary variable of the given kind for `key`.
    pub fn auxiliary_var(&mut self, kind: AuxKind, key: AuxKey) -> Result<BoolVar, InvalidReference> {
        match key {
            AuxKey::StepPair(first, second) => {
                self.check_step(first)?;
                self.check_step(second)?;
            }
            AuxKey::Step(_, step) => self.check_step(step)?,
            AuxKey::User(_, user) => self.check_user(user)?,
            AuxKey::Constraint(_) | AuxKey::Group(_, _) => {}
        }

        if let Some(&variable) = self.auxiliaries.get(&(kind, key)) {
            return Ok(variable);
        }

        let variable = self.origins.push(VariableOrigin::Auxiliary { kind, key });
        let _ = self.auxiliaries.insert((kind, key), variable);
        Ok(variable)
    }

    pub fn get_auxiliary_var(&self, kind: AuxKind, key: AuxKey) -> Option<BoolVar> {
        self.auxiliaries.get(&(kind, key)).copied()
    }

    pub fn origin(&self, variable: BoolVar) -> Option<&VariableOrigin> {
        self.origins.get(variable)
    }

    pub fn num_variables(&self) -> usize {
        self.origins.len()
    }

    pub(crate) fn into_origins(self) -> KeyedVec<BoolVar, VariableOrigin> {
        self.origins
    }

    fn check_step(&self, step: StepId) -> Result<(), InvalidReference> {
        if step.id() == 0 || step.id() > self.num_steps {
            return Err(InvalidReference::Step {
                step,
                num_steps: self.num_steps,
            });
        }
        Ok(())
    }

    fn check_user(&self, user: UserId) -> Result<(), InvalidReference> {
        if user.id() == 0 || user.id() > self.num_users {
            return Err(InvalidReference::User {
                user,
                num_users: self.num_users,
            });
        }
        Ok(())
    }
}
