use std::io;
use std::io::Write;

use wsp_core::basic_types::UserId;
use wsp_core::constraints::Constraint;
use wsp_core::instance::Instance;

/// Writes `instance` in the format accepted by [`read_instance`](super::read_instance).
///
/// Authorizations are written in their merged form, so the constraint count may be lower than
/// the one of the file the instance was read from.
pub fn write_instance(instance: &Instance, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "#Steps: {}", instance.num_steps())?;
    writeln!(writer, "#Users: {}", instance.num_users())?;
    writeln!(writer, "#Constraints: {}", instance.num_constraints())?;

    for (_, constraint) in instance.constraints() {
        write_constraint(constraint, &mut writer)?;
    }

    Ok(())
}

/// Writes a single constraint line, including the trailing newline.
pub fn write_constraint(constraint: &Constraint, mut writer: impl Write) -> io::Result<()> {
    write!(writer, "{}", constraint.kind().keyword())?;

    match constraint {
        Constraint::Authorization(authorization) => {
            write!(writer, " {}", authorization.user)?;
            write_all(&mut writer, &authorization.steps)?;
        }
        Constraint::SeparationOfDuty(constraint) => {
            write!(writer, " {} {}", constraint.first, constraint.second)?;
        }
        Constraint::BindingOfDuty(constraint) => {
            write!(writer, " {} {}", constraint.first, constraint.second)?;
        }
        Constraint::AtMostK(constraint) => {
            write!(writer, " {}", constraint.limit)?;
            write_all(&mut writer, &constraint.steps)?;
        }
        Constraint::OneTeam(constraint) => {
            write_all(&mut writer, &constraint.steps)?;
            write_groups(&mut writer, &constraint.teams)?;
        }
        Constraint::SuperUserAtLeast(constraint) => {
            write!(writer, " {}", constraint.threshold)?;
            write_all(&mut writer, &constraint.steps)?;
            write_all(&mut writer, &constraint.super_users)?;
        }
        Constraint::WangLi(constraint) => {
            write_all(&mut writer, &constraint.steps)?;
            write_groups(&mut writer, &constraint.departments)?;
        }
        Constraint::AssignmentDependent(constraint) => {
            write!(writer, " {} {}", constraint.source_step, constraint.target_step)?;
            write_groups(
                &mut writer,
                &[
                    constraint.source_users.clone(),
                    constraint.target_users.clone(),
                ],
            )?;
        }
    }

    writeln!(writer)
}

fn write_all<T: std::fmt::Display>(writer: &mut impl Write, items: &[T]) -> io::Result<()> {
    items.iter().try_for_each(|item| write!(writer, " {item}"))
}

fn write_groups(writer: &mut impl Write, groups: &[Vec<UserId>]) -> io::Result<()> {
    for group in groups {
        write!(writer, " (")?;
        for (index, user) in group.iter().enumerate() {
            if index > 0 {
                write!(writer, " ")?;
            }
            write!(writer, "{user}")?;
        }
        write!(writer, ")")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use wsp_core::instance::Instance;

    use super::*;
    use crate::file_format::read_instance;

    const SOURCE: &str = "\
#Steps: 3
#Users: 4
#Constraints: 5
Authorisations u1 s1 s2
One-team s1 s2 (u1 u2) (u3)
Authorisations u1 s3
Super-user-at-least 2 s1 s2 s3 u4
Assignment-dependent s1 s3 (u1) (u2 u3)
";

    #[test]
    fn written_instance_reads_back_to_the_same_instance() {
        let instance = Instance::new(read_instance(SOURCE.as_bytes()).expect("valid file"))
            .expect("valid instance");

        let mut written = vec![];
        write_instance(&instance, &mut written).expect("writing to memory");
        let reread = Instance::new(read_instance(written.as_slice()).expect("valid file"))
            .expect("valid instance");

        assert_eq!(instance, reread);
    }

    #[test]
    fn authorizations_are_written_merged() {
        let instance = Instance::new(read_instance(SOURCE.as_bytes()).expect("valid file"))
            .expect("valid instance");

        let mut written = vec![];
        write_instance(&instance, &mut written).expect("writing to memory");
        let written = String::from_utf8(written).expect("utf8 output");

        assert_eq!(
            written,
            "\
#Steps: 3
#Users: 4
#Constraints: 4
Authorisations u1 s1 s2 s3
One-team s1 s2 (u1 u2) (u3)
Super-user-at-least 2 s1 s2 s3 u4
Assignment-dependent s1 s3 (u1) (u2 u3)
"
        );
    }
}
