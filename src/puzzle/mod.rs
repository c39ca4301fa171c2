//! Tents and Trees puzzle model.
//!
//! A puzzle is a grid with trees on some cells and a tent target for every
//! row and column. A placement of tents is correct when:
//!
//! - no tent stands on a tree or outside the grid,
//! - no two tents touch, not even diagonally,
//! - every tree has a tent on one of its four sides and every tent has a
//!   tree on one of its four sides,
//! - every row and column holds exactly its target number of tents.
//!
//! # Key Components
//!
//! - [`Cell`]: a `(row, col)` coordinate with neighbourhood helpers
//! - [`Puzzle`]: the immutable puzzle definition and candidate cells
//! - [`ValidationReport`]: the full list of [`Violation`]s of a placement
//!
//! Solving lives in [`crate::solver`]; this module only adjudicates.

mod board;
mod grid;
mod validate;

pub use board::Puzzle;
pub use grid::Cell;
pub use validate::{ValidationReport, Violation};
