//! Output of run statistics in the `PREFIX name=value` line format.
mod statistic_logging;

pub use statistic_logging::*;
