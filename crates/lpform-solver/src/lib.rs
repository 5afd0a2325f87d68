//! Model building and solve orchestration for small linear programs.
//!
//! A [`ProblemInput`] is validated into a [`Model`], which a [`Solver`] hands to an
//! LP [`Backend`] (by default the `microlp` simplex solver) to obtain a [`SolveResult`].

mod error;
mod input;
mod problem;
mod solution;
mod solver;

pub use error::ModelError;
pub use input::{ConstraintInput, DEFAULT_HEADING, Limits, ProblemInput};
pub use problem::{Constraint, ConstraintOp, Direction, Model, Objective, Variable};
pub use solution::{ConstraintViolation, SolveResult, SolveStatus};
pub use solver::{Backend, Microlp, Outcome, Solver};
