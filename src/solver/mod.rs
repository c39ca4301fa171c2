//! Tents and Trees solving on top of the [`cp`](crate::cp) layer.
//!
//! # Formulation
//!
//! One binary variable per cell that could legally hold a tent (free of
//! trees and edge-adjacent to one), with:
//!
//! - row and column equalities against the tent targets,
//! - `x_a + x_b <= 1` for every touching pair of candidate cells,
//! - `sum >= 1` over the candidates around every tree.
//!
//! Any assignment the backend reports is decoded to cells and re-checked
//! with [`Puzzle::validate_solution`](crate::puzzle::Puzzle::validate_solution)
//! before it is returned.
//!
//! # Usage
//!
//! ```
//! use tents_trees::puzzle::{Cell, Puzzle};
//! use tents_trees::solver::{describe_model, solve, SolveOptions};
//!
//! let puzzle = Puzzle::new(vec![1, 0], vec![0, 1], [(1, 1)]).unwrap();
//! assert_eq!(describe_model(&puzzle).variables, 2);
//!
//! let tents = solve(&puzzle, &SolveOptions::default()).unwrap();
//! assert_eq!(tents.into_iter().collect::<Vec<_>>(), vec![Cell::new(0, 1)]);
//! ```

mod config;
mod formulation;
mod runner;
mod types;

pub use config::SolveOptions;
pub use formulation::TentsFormulation;
pub use runner::{describe_model, export_model, solve, TentsSolver};
pub use types::{ConstraintCounts, ModelSummary, SolverInfo};
