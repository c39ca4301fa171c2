//! CP solver interface, configuration and results.

use std::time::Duration;

use super::model::LinearModel;
use super::variables::VarId;
use crate::error::BackendError;

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Branching decisions taken.
    pub nodes: u64,
    /// Decisions undone.
    pub backtracks: u64,
    /// Values fixed by propagation.
    pub propagations: u64,
    /// Complete assignments found.
    pub solutions: u64,
    /// Wall-clock time spent in the search.
    pub elapsed: Duration,
}

impl SearchStats {
    /// Elapsed time in whole milliseconds, saturating at `u64::MAX`.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// A complete assignment returned by a solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpSolution {
    /// One value per model variable, indexed by [`VarId::index`].
    pub values: Vec<bool>,
    /// Objective value, when the model has an objective.
    pub objective_value: Option<i64>,
    /// Search counters at the time the solution was reported.
    pub stats: SearchStats,
}

impl CpSolution {
    /// Value assigned to `var`.
    pub fn value(&self, var: VarId) -> bool {
        self.values[var.0]
    }

    /// Variables assigned `true`, in model order.
    pub fn true_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| VarId(i))
    }
}

/// Result of a solver run that did not fail.
///
/// Together with the `Err` arm of [`CpSolver::solve`] these are the only
/// outcomes a backend may report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverOutcome {
    /// An assignment proven optimal for the model's objective.
    Optimal(CpSolution),
    /// A feasible assignment; for pure feasibility models this is final.
    Feasible(CpSolution),
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The time limit elapsed before any assignment was found or
    /// infeasibility was proven.
    TimeLimitReached {
        /// Search counters at the moment the limit was hit.
        stats: SearchStats,
    },
}

impl SolverOutcome {
    /// Whether an assignment was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self, SolverOutcome::Optimal(_) | SolverOutcome::Feasible(_))
    }

    /// The assignment, if one was found.
    pub fn solution(&self) -> Option<&CpSolution> {
        match self {
            SolverOutcome::Optimal(s) | SolverOutcome::Feasible(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the outcome and returns the assignment, if one was found.
    pub fn into_solution(self) -> Option<CpSolution> {
        match self {
            SolverOutcome::Optimal(s) | SolverOutcome::Feasible(s) => Some(s),
            _ => None,
        }
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tents_trees::cp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_secs(5))
///     .with_verbose(true);
/// assert_eq!(config.time_limit, Some(Duration::from_secs(5)));
/// assert!(!config.stop_after_first);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum wall-clock search time; `None` searches until done.
    pub time_limit: Option<Duration>,
    /// Emit search progress events at INFO level.
    pub verbose: bool,
    /// With an objective, stop at the first feasible assignment instead of
    /// proving optimality.
    pub stop_after_first: bool,
}

impl SolverConfig {
    /// Sets the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enables or disables progress logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Stops at the first feasible assignment.
    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual search over a [`LinearModel`]. This can
/// wrap an external MIP or SAT solver or run a custom search; callers only
/// see the four outcomes of [`SolverOutcome`] and [`BackendError`].
pub trait CpSolver {
    /// Short backend name, for diagnostics.
    fn name(&self) -> &str;

    /// Solves the model.
    fn solve(
        &self,
        model: &LinearModel,
        config: &SolverConfig,
    ) -> Result<SolverOutcome, BackendError>;
}
