//! Solve options.

use std::time::Duration;

use crate::cp::SolverConfig;

/// Options for [`TentsSolver::solve`](super::TentsSolver::solve).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tents_trees::solver::SolveOptions;
///
/// let options = SolveOptions::default()
///     .with_time_limit(Duration::from_secs(10))
///     .with_verbose(true);
/// assert_eq!(options.time_limit, Some(Duration::from_secs(10)));
/// assert!(options.verbose);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SolveOptions {
    /// Maximum wall-clock search time. `None` (the default) is unbounded.
    pub time_limit: Option<Duration>,
    /// Log search progress at INFO level.
    pub verbose: bool,
}

impl SolveOptions {
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

    /// Backend configuration for these options.
    pub(crate) fn solver_config(&self) -> SolverConfig {
        let config = SolverConfig::default().with_verbose(self.verbose);
        match self.time_limit {
            Some(limit) => config.with_time_limit(limit),
            None => config,
        }
    }
}
