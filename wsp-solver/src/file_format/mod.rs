//! The line-based text formats for instances and solutions.
//!
//! An instance file starts with three header lines followed by one constraint per line:
//! ```text
//! #Steps: 3
//! #Users: 3
//! #Constraints: 2
//! Authorisations u1 s1 s2
//! Separation-of-duty s1 s2
//! ```
//! A solution file holds the status (`sat`, `unsat` or `unknown`), the elapsed time in
//! milliseconds and one `Step i -> User j` line per assigned step.
mod error;
mod instance_reader;
mod instance_writer;
mod line_parser;
mod solution;

pub use error::Error;
pub use instance_reader::*;
pub use instance_writer::*;
pub use solution::*;
