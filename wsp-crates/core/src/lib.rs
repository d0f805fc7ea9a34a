//! # WSP core
//! The constraint formulation and verification engine for the Workflow Satisfiability Problem
//! (WSP): every step of a workflow has to be assigned exactly one user while authorizations and
//! organisational constraints are respected.
//!
//! The crate
//! * models an instance as a validated [`Instance`](instance::Instance),
//! * compiles it into one of three encodings (see [`EncodingMode`](encoding::EncodingMode)),
//! * verifies candidate assignments independently of any encoding, and
//! * defines the [`SolverBackend`](backend::SolverBackend) contract, with an exhaustive reference
//!   backend.
//!
//! ```rust
//! # use wsp_core::backend::BackendResult;
//! # use wsp_core::backend::ExhaustiveSearch;
//! # use wsp_core::backend::SolverBackend;
//! # use wsp_core::basic_types::StepId;
//! # use wsp_core::basic_types::UserId;
//! # use wsp_core::constraints::ConstraintKind;
//! # use wsp_core::constraints::SeparationOfDuty;
//! # use wsp_core::encoding::compile;
//! # use wsp_core::encoding::EncodingMode;
//! # use wsp_core::instance::Instance;
//! # use wsp_core::instance::InstanceRecord;
//! # use wsp_core::termination::Indefinite;
//! # use wsp_core::verification::verify;
//! // Two steps which have to be performed by different users.
//! let instance = Instance::new(InstanceRecord::new(
//!     2,
//!     2,
//!     vec![SeparationOfDuty::new(StepId::new(1), StepId::new(2)).into()],
//! ))?;
//!
//! let model = compile(&instance, ConstraintKind::all(), EncodingMode::PatternBased)?;
//! let result = ExhaustiveSearch::default().solve(&model, &mut Indefinite);
//!
//! let BackendResult::Satisfiable(assignment) = result else {
//!     panic!("the instance has a solution");
//! };
//! assert!(verify(&instance, &assignment, ConstraintKind::all()).all_satisfied());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#[doc(hidden)]
pub mod asserts;

pub mod backend;
pub mod basic_types;
pub mod constraints;
pub mod containers;
pub mod encoding;
pub mod instance;
pub mod options;
pub mod statistics;
pub mod termination;
pub mod verification;

pub use convert_case;
pub use enumset;

pub use crate::encoding::compile;
pub use crate::encoding::compile_with_options;
pub use crate::verification::verify;
pub use crate::verification::verify_with_options;
