use std::fmt::Display;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::time::Duration;

use wsp_core::basic_types::Assignment;
use wsp_core::basic_types::StepId;
use wsp_core::basic_types::UserId;

use super::line_parser::LineParser;
use super::Error;

/// The outcome recorded in a solution file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Satisfiable,
    Unsatisfiable,
    Unknown,
}

impl SolutionStatus {
    fn keyword(self) -> &'static str {
        match self {
            SolutionStatus::Satisfiable => "sat",
            SolutionStatus::Unsatisfiable => "unsat",
            SolutionStatus::Unknown => "unknown",
        }
    }
}

impl Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// The content of a solution file.
///
/// ```text
/// sat
/// 12.5
/// Step 1 -> User 2
/// Step 2 -> User 1
/// ```
/// The second line is the elapsed time in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFile {
    pub status: SolutionStatus,
    pub elapsed: Duration,
    pub assignment: Assignment,
}

pub fn write_solution(solution: &SolutionFile, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "{}", solution.status)?;
    writeln!(writer, "{}", solution.elapsed.as_nanos() as f64 / 1e6)?;

    for &(step, user) in solution.assignment.pairs() {
        writeln!(writer, "Step {} -> User {}", step.id(), user.id())?;
    }

    Ok(())
}

/// Reads a solution file.
///
/// Assignment lines are kept as written: duplicate or out-of-range steps are left for the
/// verifier to report.
pub fn read_solution(source: impl Read) -> Result<SolutionFile, Error> {
    let mut reader = BufReader::new(source);
    let mut buffer = String::new();
    let mut line_nr = 0;

    let mut status = None;
    let mut elapsed = None;
    let mut assignment = Assignment::new();

    loop {
        buffer.clear();
        if reader.read_line(&mut buffer)? == 0 {
            break;
        }
        line_nr += 1;

        let mut parser = LineParser::new(&buffer, line_nr);
        if parser.peek_token().is_none() {
            continue;
        }

        if status.is_none() {
            let keyword = parser.consume_word()?;
            status = Some(match keyword {
                "sat" => SolutionStatus::Satisfiable,
                "unsat" => SolutionStatus::Unsatisfiable,
                "unknown" => SolutionStatus::Unknown,
                _ => {
                    return Err(parser.error(
                        format!("expected 'sat', 'unsat' or 'unknown', found '{keyword}'"),
                        0,
                    ))
                }
            });
        } else if elapsed.is_none() {
            let milliseconds = parser.consume_decimal()?;
            elapsed = Some(Duration::from_nanos((milliseconds * 1e6).round() as u64));
        } else {
            parser.consume_str("Step")?;
            let step = StepId::new(parser.consume_unsigned()?);
            parser.consume_str("->")?;
            parser.consume_str("User")?;
            let user = UserId::new(parser.consume_unsigned()?);
            assignment.assign(step, user);
        }

        parser.expect_end()?;
    }

    Ok(SolutionFile {
        status: status.ok_or(Error::MissingHeader("status"))?,
        elapsed: elapsed.ok_or(Error::MissingHeader("time"))?,
        assignment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_file_is_read() {
        let source = "sat\n12.5\nStep 1 -> User 2\nStep 2 -> User 1\n";

        let solution = read_solution(source.as_bytes()).expect("valid solution");

        assert_eq!(solution.status, SolutionStatus::Satisfiable);
        assert_eq!(solution.elapsed, Duration::from_micros(12_500));
        assert_eq!(
            solution.assignment,
            Assignment::from_users([UserId::new(2), UserId::new(1)])
        );
    }

    #[test]
    fn written_solution_is_read_back() {
        let solution = SolutionFile {
            status: SolutionStatus::Satisfiable,
            elapsed: Duration::from_millis(3),
            assignment: Assignment::from_users([UserId::new(3), UserId::new(1), UserId::new(3)]),
        };

        let mut written = vec![];
        write_solution(&solution, &mut written).expect("writing to memory");

        assert_eq!(
            String::from_utf8(written.clone()).expect("utf8"),
            "sat\n3\nStep 1 -> User 3\nStep 2 -> User 1\nStep 3 -> User 3\n"
        );
        assert_eq!(read_solution(written.as_slice()).expect("valid"), solution);
    }

    #[test]
    fn unsatisfiable_solution_has_no_assignment() {
        let solution = read_solution("unsat\n0\n".as_bytes()).expect("valid solution");

        assert_eq!(solution.status, SolutionStatus::Unsatisfiable);
        assert!(solution.assignment.is_empty());
    }

    #[test]
    fn malformed_assignment_line_is_rejected() {
        let result = read_solution("sat\n1\nStep 1 => User 2\n".as_bytes());

        assert!(matches!(result, Err(Error::ParseError { line_nr: 3, .. })));
    }

    #[test]
    fn missing_time_is_reported() {
        let result = read_solution("sat\n".as_bytes());

        assert!(matches!(result, Err(Error::MissingHeader("time"))));
    }
}
