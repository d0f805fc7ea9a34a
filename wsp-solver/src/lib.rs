//! # WSP solver
//! Reading and writing of workflow satisfiability instances and solutions, on top of the
//! formulation and verification engine in [`core`].
pub mod file_format;

pub use wsp_core as core;
