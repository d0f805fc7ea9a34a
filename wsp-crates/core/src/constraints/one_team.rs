use super::groups::encode_within_one_group;
use super::groups::within_one_group;
use crate::basic_types::StepId;
use crate::basic_types::UserId;
use crate::encoding::AuxKind;
use crate::encoding::EncodingContext;
use crate::encoding::EncodingError;
use crate::verification::EvaluationContext;
use crate::verification::Violation;

/// All users performing the steps of the scope are members of one of the teams.
///
/// Teams may overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTeam {
    pub steps: Vec<StepId>,
    pub teams: Vec<Vec<UserId>>,
}

impl OneTeam {
    pub fn new(steps: Vec<StepId>, teams: Vec<Vec<UserId>>) -> OneTeam {
        OneTeam { steps, teams }
    }

    pub(crate) fn encode(&self, context: &mut EncodingContext<'_>) -> Result<(), EncodingError> {
        encode_within_one_group(context, &self.steps, &self.teams, AuxKind::TeamSelector)
    }

    pub(crate) fn evaluate(&self, context: &EvaluationContext<'_>) -> Vec<Violation> {
        match context.distinct_users(&self.steps) {
            Ok(users) if !within_one_group(&users, &self.teams) => {
                vec![Violation::NoCommonTeam { users }]
            }
            Ok(_) => vec![],
            Err(violation) => vec![violation],
        }
    }
}
