/// Options which change the meaning of an instance, honoured identically by the encoding
/// compiler and the verifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemanticOptions {
    /// How users without any authorization entry are treated.
    pub unlisted_users: UnlistedUserPolicy,
    /// Which users of a department count when deciding whether a Wang-Li constraint applies.
    pub department_pool: DepartmentPool,
}

/// The treatment of users which are not mentioned by any authorization entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum UnlistedUserPolicy {
    /// An unlisted user may perform every step.
    #[default]
    OpenWorld,
    /// An unlisted user may perform no step at all.
    ClosedWorld,
}

/// Determines when a department is able to cover a step of a Wang-Li constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DepartmentPool {
    /// A department covers a step if one of its members is in the domain of that step.
    #[default]
    Authorized,
    /// Every non-empty department covers every step; authorizations are not consulted.
    Members,
}
