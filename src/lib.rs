//! Tents and Trees puzzle solver.
//!
//! A Tents and Trees puzzle is a rectangular grid with trees on some cells
//! and a tent target for every row and column. Tents go on empty cells so
//! that every tree has its own tent on one of its four sides, no two tents
//! touch (diagonals included), and every row and column meets its target.
//!
//! The crate is split into three layers:
//!
//! - **Puzzle**: [`puzzle::Puzzle`] holds the validated input, and
//!   [`puzzle::Puzzle::validate_solution`] checks any placement against the
//!   rules, reporting every broken rule.
//! - **CP (Constraint Programming)**: a domain-agnostic binary linear model
//!   ([`cp::LinearModel`]), the [`cp::CpSolver`] backend interface, the exact
//!   [`cp::BacktrackingSolver`] and CPLEX LP export.
//! - **Solver**: [`solver::TentsSolver`] turns a puzzle into a
//!   [`cp::LinearModel`], runs a backend and decodes the tents.
//!
//! # Example
//!
//! ```
//! use tents_trees::puzzle::Puzzle;
//! use tents_trees::solver::{solve, SolveOptions};
//!
//! let puzzle = Puzzle::new(
//!     vec![1, 1, 0, 2, 1],
//!     vec![2, 0, 1, 1, 1],
//!     [(1, 1), (1, 3), (3, 0), (3, 1), (4, 4)],
//! )?;
//! let tents = solve(&puzzle, &SolveOptions::default())?;
//! assert!(puzzle.validate_solution(&tents).is_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for puzzles, cells, options and
//!   model summaries
//! - `parallel`: [`solver::TentsSolver::solve_all`] solves puzzles on the
//!   rayon thread pool
//!
//! Progress and diagnostics are emitted as `tracing` events; install any
//! subscriber to see them.

pub mod cp;
pub mod puzzle;
pub mod solver;

mod error;

pub use error::{BackendError, InvalidPuzzleError, SolveError};
