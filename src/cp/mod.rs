//! Constraint Programming (CP) layer for binary linear models.
//!
//! Provides a domain-agnostic model of boolean variables, linear
//! constraints and an optional linear objective, plus the interface every
//! solving backend implements.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`], addressed by [`VarId`]
//! - **Constraints**: [`LinearConstraint`], `sum(coef * x) (<=|>=|=) rhs`
//! - **Model**: [`LinearModel`], container for variables, constraints, objective
//! - **Solver**: [`CpSolver`] trait, the interface for solver implementations
//! - **Backend**: [`BacktrackingSolver`], exact search with bounds propagation
//!
//! # Design
//!
//! A backend answers with one of four outcomes: an assignment
//! ([`SolverOutcome::Feasible`] or [`SolverOutcome::Optimal`]), a proof of
//! infeasibility, an exhausted time limit, or a [`BackendError`]. Any MIP,
//! SAT or custom search that honours this contract can replace
//! [`BacktrackingSolver`].
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"
//!
//! [`BackendError`]: crate::BackendError

mod lp;
mod model;
mod search;
mod solver;
mod variables;

pub use model::{LinearConstraint, LinearModel, Objective, Sense};
pub use search::BacktrackingSolver;
pub use solver::{CpSolution, CpSolver, SearchStats, SolverConfig, SolverOutcome};
pub use variables::{BoolVar, VarId};
