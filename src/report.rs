//! Suite summary and result reporting.
//!
//! One report per suite run: aggregate counts for CI plus a per-scenario
//! breakdown, serializable to JSON for machine consumers.

use crate::runner::{ScenarioOutcome, Verdict};
use serde::Serialize;
use std::time::Duration;

/// Machine-readable summary of one suite run.
#[derive(Debug, Serialize)]
pub struct SuiteReport {
    pub run_id: String,
    pub started_at: String,
    pub duration_ms: u64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub skipped: usize,
    pub success_rate: f64,
    pub scenarios: Vec<ScenarioReport>,
}

/// One scenario's row in the report.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub status: String,
    pub duration_ms: u64,
    pub exit_code: Option<i32>,
    /// Failure or skip reason, verbatim.
    pub detail: Option<String>,
}

impl SuiteReport {
    pub fn new(outcomes: &[ScenarioOutcome], duration: Duration) -> Self {
        let total = outcomes.len();
        let mut passed = 0;
        let mut failed = 0;
        let mut timed_out = 0;
        let mut skipped = 0;

        let scenarios = outcomes
            .iter()
            .map(|outcome| {
                let (status, detail) = match &outcome.verdict {
                    Verdict::Passed => {
                        passed += 1;
                        ("passed", None)
                    }
                    Verdict::Failed { reason } => {
                        failed += 1;
                        ("failed", Some(reason.clone()))
                    }
                    Verdict::TimedOut => {
                        timed_out += 1;
                        ("timed_out", None)
                    }
                    Verdict::Skipped { reason } => {
                        skipped += 1;
                        ("skipped", Some(reason.clone()))
                    }
                };
                ScenarioReport {
                    name: outcome.name.clone(),
                    status: status.to_string(),
                    duration_ms: outcome.duration.as_millis() as u64,
                    exit_code: outcome.exit_code,
                    detail,
                }
            })
            .collect();

        let success_rate = if total > 0 {
            (passed as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        Self {
            run_id: format!("run_{}", &uuid::Uuid::new_v4().to_string()[..8]),
            started_at: chrono::Utc::now().to_rfc3339(),
            duration_ms: duration.as_millis() as u64,
            total,
            passed,
            failed,
            timed_out,
            skipped,
            success_rate,
            scenarios,
        }
    }

    /// True when nothing failed, timed out, or was skipped away.
    pub fn success(&self) -> bool {
        self.failed == 0 && self.timed_out == 0 && self.skipped == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human rendering, printed to stdout by the CLI.
    pub fn render_human(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Suite Result ===\n");
        out.push_str(&format!("Run: {}\n", self.run_id));
        out.push_str(&format!(
            "Scenarios: {} ({} passed, {} failed, {} timed out, {} skipped)\n",
            self.total, self.passed, self.failed, self.timed_out, self.skipped
        ));
        out.push_str(&format!("Duration: {} ms\n", self.duration_ms));

        for scenario in &self.scenarios {
            if scenario.status == "passed" {
                continue;
            }
            out.push_str(&format!("\n[{}] {}\n", scenario.status, scenario.name));
            if let Some(detail) = &scenario.detail {
                for line in detail.lines() {
                    out.push_str(&format!("  {line}\n"));
                }
            }
        }

        out.push_str(&format!(
            "\nStatus: {}\n",
            if self.success() { "PASS" } else { "FAIL" }
        ));
        out
    }
}
