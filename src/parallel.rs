//! Parallel suite execution.
//!
//! Scenarios are independent once staged (each run owns its staging
//! directory, see the runner), so the suite can fan out across workers.
//! Result order matches input order regardless of completion order.

use crate::fixture::Scenario;
use crate::runner::{run_scenario, RunnerConfig, ScenarioOutcome};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Parallel execution configuration.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Maximum number of concurrently executing scenarios.
    pub max_workers: usize,
    /// Stop launching new scenarios after the first failure.
    pub fail_fast: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        let max_workers = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);

        Self {
            max_workers,
            fail_fast: false,
        }
    }
}

/// Run scenarios across a bounded worker pool.
///
/// With `fail_fast`, scenarios that have not started when a failure lands
/// are reported as skipped; scenarios already executing run to completion.
pub fn run_parallel(
    scenarios: &[Scenario],
    runner_config: &RunnerConfig,
    config: &ParallelConfig,
) -> Vec<ScenarioOutcome> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_workers.max(1))
        .build();

    let run_all = |fail_fast: bool| -> Vec<ScenarioOutcome> {
        let has_failed = Arc::new(AtomicBool::new(false));
        scenarios
            .par_iter()
            .map(|scenario| {
                if fail_fast && has_failed.load(Ordering::Acquire) {
                    return ScenarioOutcome::skipped(&scenario.name, "earlier scenario failed");
                }
                let outcome = run_scenario(scenario, runner_config);
                if fail_fast && !outcome.passed() {
                    // Release pairs with the Acquire load above so workers
                    // observing the flag also observe the failed outcome.
                    has_failed.store(true, Ordering::Release);
                }
                outcome
            })
            .collect()
    };

    match pool {
        Ok(pool) => pool.install(|| run_all(config.fail_fast)),
        // Pool construction can fail under exotic resource limits; the
        // global pool still honors result ordering.
        Err(_) => run_all(config.fail_fast),
    }
}
