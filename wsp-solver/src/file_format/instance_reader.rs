use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use wsp_core::constraints::AssignmentDependent;
use wsp_core::constraints::AtMostK;
use wsp_core::constraints::Authorization;
use wsp_core::constraints::BindingOfDuty;
use wsp_core::constraints::Constraint;
use wsp_core::constraints::ConstraintKind;
use wsp_core::constraints::OneTeam;
use wsp_core::constraints::SeparationOfDuty;
use wsp_core::constraints::SuperUserAtLeast;
use wsp_core::constraints::WangLi;
use wsp_core::instance::InstanceRecord;

use super::line_parser::LineParser;
use super::Error;

const STEPS_HEADER: &str = "#Steps";
const USERS_HEADER: &str = "#Users";
const CONSTRAINTS_HEADER: &str = "#Constraints";

/// Reads an instance file into a record.
///
/// The record is not validated; the declared constraint count and all references are checked
/// when building an [`Instance`](wsp_core::instance::Instance) from it. Blank lines are ignored,
/// and both `Authorisations` and `Authorizations` are accepted.
pub fn read_instance(source: impl Read) -> Result<InstanceRecord, Error> {
    let mut reader = BufReader::new(source);
    let mut buffer = String::new();
    let mut line_nr = 0;

    let mut step_count = None;
    let mut user_count = None;
    let mut constraint_count = None;
    let mut constraints = vec![];

    loop {
        buffer.clear();
        if reader.read_line(&mut buffer)? == 0 {
            break;
        }
        line_nr += 1;

        let mut parser = LineParser::new(&buffer, line_nr);
        match parser.peek_token() {
            None => continue,
            Some(b'#') => {
                let header = parser.consume_word()?;
                let slot = match header {
                    STEPS_HEADER => &mut step_count,
                    USERS_HEADER => &mut user_count,
                    CONSTRAINTS_HEADER => &mut constraint_count,
                    _ => return Err(parser.error(format!("unknown header '{header}'"), 0)),
                };
                if slot.is_some() {
                    return Err(parser.error(format!("duplicate header '{header}'"), 0));
                }
                *slot = Some(parser.consume_unsigned()?);
                parser.expect_end()?;
            }
            Some(_) => {
                constraints.push(parse_constraint(&mut parser)?);
                parser.expect_end()?;
            }
        }
    }

    Ok(InstanceRecord {
        step_count: step_count.ok_or(Error::MissingHeader(STEPS_HEADER))?,
        user_count: user_count.ok_or(Error::MissingHeader(USERS_HEADER))?,
        constraint_count: constraint_count.ok_or(Error::MissingHeader(CONSTRAINTS_HEADER))?,
        constraints,
    })
}

fn parse_constraint(parser: &mut LineParser<'_>) -> Result<Constraint, Error> {
    let keyword = parser.consume_word()?;
    let kind = if keyword == "Authorizations" {
        ConstraintKind::Authorization
    } else {
        ConstraintKind::all()
            .iter()
            .find(|kind| kind.keyword() == keyword)
            .ok_or_else(|| parser.error(format!("unknown constraint '{keyword}'"), 0))?
    };

    let constraint = match kind {
        ConstraintKind::Authorization => {
            let user = parser.consume_user()?;
            Authorization::new(user, parser.consume_steps()?).into()
        }
        ConstraintKind::SeparationOfDuty => {
            SeparationOfDuty::new(parser.consume_step()?, parser.consume_step()?).into()
        }
        ConstraintKind::BindingOfDuty => {
            BindingOfDuty::new(parser.consume_step()?, parser.consume_step()?).into()
        }
        ConstraintKind::AtMostK => {
            let limit = parser.consume_unsigned()?;
            AtMostK::new(limit, parser.consume_steps()?).into()
        }
        ConstraintKind::OneTeam => {
            let steps = parser.consume_steps()?;
            OneTeam::new(steps, parser.consume_groups()?).into()
        }
        ConstraintKind::SuperUserAtLeast => {
            let threshold = parser.consume_unsigned()?;
            let steps = parser.consume_steps()?;
            SuperUserAtLeast::new(threshold, steps, parser.consume_users()?).into()
        }
        ConstraintKind::WangLi => {
            let steps = parser.consume_steps()?;
            WangLi::new(steps, parser.consume_groups()?).into()
        }
        ConstraintKind::AssignmentDependent => {
            let source_step = parser.consume_step()?;
            let target_step = parser.consume_step()?;
            let source_users = parser.consume_group()?;
            let target_users = parser.consume_group()?;
            AssignmentDependent::new(source_step, target_step, source_users, target_users).into()
        }
    };

    Ok(constraint)
}
