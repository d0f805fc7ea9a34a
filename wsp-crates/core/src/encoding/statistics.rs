use crate::statistics::log_statistic;

/// Size measures of an [`EncodingModel`](super::EncodingModel).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodingStatistics {
    pub num_variables: usize,
    pub num_decision_variables: usize,
    pub num_auxiliary_variables: usize,
    pub num_clauses: usize,
    pub num_linear_constraints: usize,
    pub num_relations: usize,
    pub num_diagnostics: usize,
}

impl EncodingStatistics {
    pub fn log(&self) {
        log_statistic("numVariables", self.num_variables);
        log_statistic("numDecisionVariables", self.num_decision_variables);
        log_statistic("numAuxiliaryVariables", self.num_auxiliary_variables);
        log_statistic("numClauses", self.num_clauses);
        log_statistic("numLinearConstraints", self.num_linear_constraints);
        log_statistic("numRelations", self.num_relations);
        log_statistic("numDiagnostics", self.num_diagnostics);
    }
}
