//! Export of pseudo-boolean models in the OPB format read by external PB solvers.
//!
//! Variable `v` of the model is written as `x{v + 1}`. Clauses become `>= 1` constraints and
//! `<=` constraints are negated, since OPB only knows `>=` and `=`.
use std::io::Write;

use thiserror::Error;

use super::Comparison;
use super::EncodingMode;
use super::EncodingModel;
use super::Formula;
use crate::containers::StorageKey;

#[derive(Error, Debug)]
pub enum OpbError {
    #[error("a {0} model contains relations and cannot be written as OPB")]
    NotPseudoBoolean(EncodingMode),
    #[error("failed to write the OPB file")]
    Io(#[from] std::io::Error),
}

/// Writes `model` in OPB format.
pub fn write_opb(model: &EncodingModel, mut writer: impl Write) -> Result<(), OpbError> {
    if !model.mode().is_pseudo_boolean() {
        return Err(OpbError::NotPseudoBoolean(model.mode()));
    }

    writeln!(
        writer,
        "* #variable= {} #constraint= {}",
        model.num_variables(),
        model.assertions().len()
    )?;
    writeln!(writer, "* {} encoding", model.mode())?;

    for assertion in model.assertions() {
        let (terms, comparison, bound) = match &assertion.formula {
            Formula::Clause(literals) => {
                // A negative literal ~x is written as 1 - x.
                let negatives = literals.iter().filter(|literal| !literal.is_positive()).count();
                let terms = literals
                    .iter()
                    .map(|literal| {
                        let weight = if literal.is_positive() { 1 } else { -1 };
                        (weight, literal.variable())
                    })
                    .collect::<Vec<_>>();
                (terms, Comparison::GreaterEqual, 1 - negatives as i64)
            }
            Formula::Linear(linear) => match linear.comparison {
                Comparison::LessEqual => (
                    linear
                        .terms
                        .iter()
                        .map(|&(weight, variable)| (-weight, variable))
                        .collect(),
                    Comparison::GreaterEqual,
                    -linear.bound,
                ),
                comparison => (linear.terms.clone(), comparison, linear.bound),
            },
            Formula::Relation(_) => return Err(OpbError::NotPseudoBoolean(model.mode())),
        };

        for (weight, variable) in terms {
            write!(writer, "{weight:+} x{} ", variable.index() + 1)?;
        }
        writeln!(writer, "{comparison} {bound} ;")?;
    }

    Ok(())
}
