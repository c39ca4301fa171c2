//! Solve execution: build the model, run the backend, decode the tents.

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::config::SolveOptions;
use super::formulation::TentsFormulation;
use super::types::{ModelSummary, SolverInfo};
use crate::cp::{BacktrackingSolver, CpSolver, SearchStats, SolverOutcome};
use crate::error::{BackendError, SolveError};
use crate::puzzle::{Cell, Puzzle};

/// Solves puzzles with a pluggable [`CpSolver`] backend.
///
/// Holds no per-puzzle state: every call builds its own model, so one
/// solver can serve many puzzles, also from several threads.
///
/// # Examples
///
/// ```
/// use tents_trees::puzzle::Puzzle;
/// use tents_trees::solver::{SolveOptions, TentsSolver};
///
/// let puzzle = Puzzle::new(
///     vec![1, 1, 0, 2, 1],
///     vec![2, 0, 1, 1, 1],
///     [(1, 1), (1, 3), (3, 0), (3, 1), (4, 4)],
/// )
/// .unwrap();
///
/// let tents = TentsSolver::new()
///     .solve(&puzzle, &SolveOptions::default())
///     .unwrap();
/// assert_eq!(tents.len(), 5);
/// assert!(puzzle.validate_solution(&tents).is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TentsSolver<S = BacktrackingSolver> {
    backend: S,
}

impl TentsSolver<BacktrackingSolver> {
    /// Creates a solver on the default [`BacktrackingSolver`] backend.
    pub fn new() -> Self {
        Self {
            backend: BacktrackingSolver::new(),
        }
    }
}

impl<S: CpSolver> TentsSolver<S> {
    /// Creates a solver on a custom backend.
    pub fn with_backend(backend: S) -> Self {
        Self { backend }
    }

    /// The backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Finds a tent placement satisfying every rule of `puzzle`.
    ///
    /// Any valid placement may be returned when several exist.
    ///
    /// # Errors
    ///
    /// - [`SolveError::NoSolution`] when the backend proves infeasibility
    /// - [`SolveError::Timeout`] when `options.time_limit` elapses first
    /// - [`SolveError::Backend`] when the backend fails or returns an
    ///   assignment that breaks the rules
    pub fn solve(
        &self,
        puzzle: &Puzzle,
        options: &SolveOptions,
    ) -> Result<BTreeSet<Cell>, SolveError> {
        let formulation = TentsFormulation::build(puzzle);
        let summary = formulation.summary();
        if options.verbose {
            info!(
                event = "solve_start",
                backend = self.backend.name(),
                rows = puzzle.rows(),
                cols = puzzle.cols(),
                trees = puzzle.trees().len(),
                variables = summary.variables,
                constraints = summary.constraints.total(),
            );
        } else {
            debug!(
                event = "solve_start",
                backend = self.backend.name(),
                variables = summary.variables,
                constraints = summary.constraints.total(),
            );
        }

        let outcome = self
            .backend
            .solve(formulation.model(), &options.solver_config())?;
        let solution = match outcome {
            SolverOutcome::Optimal(solution) | SolverOutcome::Feasible(solution) => solution,
            SolverOutcome::Infeasible => {
                log_solve_end(options.verbose, "infeasible", None);
                return Err(SolveError::NoSolution);
            }
            SolverOutcome::TimeLimitReached { stats } => {
                log_solve_end(options.verbose, "timeout", Some(&stats));
                return match options.time_limit {
                    Some(limit) => Err(SolveError::Timeout { limit }),
                    None => Err(BackendError::UnexpectedOutcome(
                        "time limit reached without a configured limit".into(),
                    )
                    .into()),
                };
            }
        };

        formulation
            .model()
            .check_assignment(&solution.values)
            .map_err(BackendError::InvalidAssignment)?;
        let tents = formulation.decode(&solution);
        let report = puzzle.validate_solution(&tents);
        if !report.is_valid() {
            return Err(BackendError::InvalidAssignment(report.to_string()).into());
        }

        log_solve_end(options.verbose, "solved", Some(&solution.stats));
        Ok(tents)
    }

    /// Solves independent puzzles, in parallel with the `parallel` feature.
    ///
    /// Results are in input order.
    #[cfg(feature = "parallel")]
    pub fn solve_all(
        &self,
        puzzles: &[Puzzle],
        options: &SolveOptions,
    ) -> Vec<Result<BTreeSet<Cell>, SolveError>>
    where
        S: Sync,
    {
        use rayon::prelude::*;

        puzzles
            .par_iter()
            .map(|puzzle| self.solve(puzzle, options))
            .collect()
    }

    /// Solves independent puzzles, in parallel with the `parallel` feature.
    ///
    /// Results are in input order.
    #[cfg(not(feature = "parallel"))]
    pub fn solve_all(
        &self,
        puzzles: &[Puzzle],
        options: &SolveOptions,
    ) -> Vec<Result<BTreeSet<Cell>, SolveError>> {
        puzzles
            .iter()
            .map(|puzzle| self.solve(puzzle, options))
            .collect()
    }

    /// Backend name and model structure for `puzzle`.
    pub fn solver_info(&self, puzzle: &Puzzle) -> SolverInfo {
        SolverInfo {
            backend: self.backend.name().to_string(),
            model: describe_model(puzzle),
        }
    }
}

fn log_solve_end(verbose: bool, outcome: &str, stats: Option<&SearchStats>) {
    let nodes = stats.map(|s| s.nodes);
    let elapsed_ms = stats.map(SearchStats::elapsed_ms);
    if verbose {
        info!(event = "solve_end", outcome, nodes, elapsed_ms);
    } else {
        debug!(event = "solve_end", outcome, nodes, elapsed_ms);
    }
}

/// Solves `puzzle` on the default backend.
///
/// Shorthand for `TentsSolver::new().solve(puzzle, options)`.
pub fn solve(puzzle: &Puzzle, options: &SolveOptions) -> Result<BTreeSet<Cell>, SolveError> {
    TentsSolver::new().solve(puzzle, options)
}

/// Variable and constraint counts of the model for `puzzle`, without solving.
pub fn describe_model(puzzle: &Puzzle) -> ModelSummary {
    TentsFormulation::build(puzzle).summary()
}

/// The model for `puzzle` in CPLEX LP format.
pub fn export_model(puzzle: &Puzzle) -> String {
    TentsFormulation::build(puzzle).model().to_lp_string()
}
