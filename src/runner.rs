//! Scenario execution.
//!
//! Every scenario runs against its own staging directory: the board file
//! (with the mandatory `.cfg` suffix) and a fresh `config.ini` are written
//! there, the game is started with that directory as its working directory,
//! and the whole directory is deleted when the run finishes. Scenarios
//! therefore share nothing on disk and can run concurrently.

use crate::compare::{compare_lines, compare_text, Mismatch};
use crate::config::GameConfig;
use crate::driver::{Driver, DriverError, ExecutionResult, DEFAULT_TIMEOUT_MS};
use crate::fixture::{ExpectedOutput, Scenario};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Name the staged board file is given; the game rejects anything that does
/// not end in lower-case `.cfg`.
const STAGED_BOARD_NAME: &str = "board.cfg";

// ============================================================================
// Verdicts
// ============================================================================

/// Terminal state of one scenario. A scenario is loaded, executes once, and
/// lands in exactly one of these; there are no retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed { reason: String },
    TimedOut,
    /// Never left the loaded state (fail-fast cut the suite short).
    Skipped { reason: String },
}

/// Result of running (or skipping) one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub verdict: Verdict,
    pub duration: Duration,
    /// Exit code of the game, when it terminated at all.
    pub exit_code: Option<i32>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Passed
    }

    pub fn skipped(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            verdict: Verdict::Skipped {
                reason: reason.into(),
            },
            duration: Duration::ZERO,
            exit_code: None,
        }
    }
}

// ============================================================================
// RunnerConfig
// ============================================================================

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the game executable under test.
    pub program: PathBuf,
    /// Per-run termination bound.
    pub timeout: Duration,
    /// Settings staged as `config.ini` before each run.
    pub game_config: GameConfig,
    pub verbose: bool,
}

impl RunnerConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            game_config: GameConfig::default(),
            verbose: false,
        }
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Run one scenario to its terminal state.
pub fn run_scenario(scenario: &Scenario, config: &RunnerConfig) -> ScenarioOutcome {
    let start = Instant::now();
    let (verdict, exit_code) = execute_scenario(scenario, config);

    if config.verbose {
        eprintln!("scenario {}: {:?}", scenario.name, verdict);
    }

    ScenarioOutcome {
        name: scenario.name.clone(),
        verdict,
        duration: start.elapsed(),
        exit_code,
    }
}

fn execute_scenario(scenario: &Scenario, config: &RunnerConfig) -> (Verdict, Option<i32>) {
    // Staging failures are harness-internal errors, surfaced as hard
    // failures rather than retried.
    let stage = match stage_scenario(scenario, config) {
        Ok(stage) => stage,
        Err(reason) => return (Verdict::Failed { reason }, None),
    };

    let driver = Driver::new(&config.program)
        .with_cwd(stage.dir.path())
        .with_timeout(config.timeout);

    let result = match driver.execute(Some(&stage.board_path), &scenario.inputs) {
        Ok(result) => result,
        Err(DriverError::Timeout { .. }) => return (Verdict::TimedOut, None),
        Err(err) => {
            return (
                Verdict::Failed {
                    reason: format!("scenario '{}': {err}", scenario.name),
                },
                None,
            )
        }
    };

    let exit_code = Some(result.exit_code());
    match check_output(scenario, &result) {
        Ok(()) => (Verdict::Passed, exit_code),
        Err(mismatch) => (
            Verdict::Failed {
                reason: failure_reason(scenario, &result, &mismatch),
            },
            exit_code,
        ),
    }
}

struct Stage {
    dir: tempfile::TempDir,
    board_path: PathBuf,
}

fn stage_scenario(scenario: &Scenario, config: &RunnerConfig) -> Result<Stage, String> {
    let dir = tempfile::TempDir::new()
        .map_err(|e| format!("scenario '{}': cannot create staging dir: {e}", scenario.name))?;

    let board_path = dir.path().join(STAGED_BOARD_NAME);
    std::fs::write(&board_path, &scenario.board)
        .map_err(|e| format!("scenario '{}': cannot stage board: {e}", scenario.name))?;

    config
        .game_config
        .write_to(dir.path())
        .map_err(|e| format!("scenario '{}': cannot stage config.ini: {e}", scenario.name))?;

    Ok(Stage { dir, board_path })
}

fn check_output(scenario: &Scenario, result: &ExecutionResult) -> Result<(), Mismatch> {
    match &scenario.expected {
        ExpectedOutput::Exact(text) => compare_text(text, &result.stdout),
        ExpectedOutput::Lines(lines) => compare_lines(lines, &result.stdout_lines()),
    }
}

/// Failure message with maximal locating context: scenario name, the
/// mismatch itself, the exit code, and any stderr the game produced.
fn failure_reason(scenario: &Scenario, result: &ExecutionResult, mismatch: &Mismatch) -> String {
    let mut reason = format!("scenario '{}': {mismatch}", scenario.name);
    reason.push_str(&format!("\nexit code: {}", result.exit_code()));
    if !result.stderr.is_empty() {
        reason.push_str(&format!("\nstderr: {}", result.stderr.trim_end()));
    }
    reason
}

/// Run every scenario sequentially, in the order given.
pub fn run_suite(scenarios: &[Scenario], config: &RunnerConfig) -> Vec<ScenarioOutcome> {
    scenarios
        .iter()
        .map(|scenario| run_scenario(scenario, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::ExpectedOutput;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn stub_game(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("game.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn scenario(name: &str, board: &str, inputs: &[&str], expected: &[&str]) -> Scenario {
        Scenario {
            name: name.to_string(),
            dir: PathBuf::from("unused"),
            board: board.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            expected: ExpectedOutput::Lines(expected.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[test]
    fn matching_output_passes() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), r#"while read -r line; do echo "got $line"; done"#);
        let scenario = scenario(
            "echoes",
            "..*\n",
            &["1 1 R", "1 2 R"],
            &["got 1 1 R", "got 1 2 R"],
        );

        let outcome = run_scenario(&scenario, &RunnerConfig::new(&game));
        assert_eq!(outcome.verdict, Verdict::Passed, "{:?}", outcome.verdict);
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[test]
    fn mismatch_fails_with_line_context() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), "echo actual");
        let scenario = scenario("diff", "..\n", &[], &["expected"]);

        let outcome = run_scenario(&scenario, &RunnerConfig::new(&game));
        match outcome.verdict {
            Verdict::Failed { reason } => {
                assert!(reason.contains("scenario 'diff'"), "reason: {reason}");
                assert!(reason.contains("line 1"), "reason: {reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn stderr_is_reported_in_failure_diagnostics() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), "echo oops 1>&2; echo actual; exit 2");
        let scenario = scenario("errs", "..\n", &[], &["expected"]);

        let outcome = run_scenario(&scenario, &RunnerConfig::new(&game));
        match outcome.verdict {
            Verdict::Failed { reason } => {
                assert!(reason.contains("stderr: oops"), "reason: {reason}");
                assert!(reason.contains("exit code: 2"), "reason: {reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(outcome.exit_code, Some(2));
    }

    #[test]
    fn runaway_game_times_out() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), "exec sleep 30");
        let scenario = scenario("hang", "..\n", &[], &["never"]);

        let mut config = RunnerConfig::new(&game);
        config.timeout = Duration::from_millis(200);

        let outcome = run_scenario(&scenario, &config);
        assert_eq!(outcome.verdict, Verdict::TimedOut);
        assert_eq!(outcome.exit_code, None);
    }

    #[test]
    fn launch_failure_is_a_hard_failure() {
        let scenario = scenario("nogame", "..\n", &[], &["out"]);
        let outcome = run_scenario(&scenario, &RunnerConfig::new("/not/a/game"));
        assert!(matches!(outcome.verdict, Verdict::Failed { .. }));
    }

    #[test]
    fn board_is_staged_with_cfg_suffix() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(
            dir.path(),
            r#"case "$1" in *.cfg) echo suffix-ok ;; *) echo bad-suffix ;; esac"#,
        );
        let scenario = scenario("suffix", "..*\n", &[], &["suffix-ok"]);

        let outcome = run_scenario(&scenario, &RunnerConfig::new(&game));
        assert_eq!(outcome.verdict, Verdict::Passed, "{:?}", outcome.verdict);
    }

    #[test]
    fn config_ini_is_staged_in_working_directory() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), "cat config.ini");
        let scenario = scenario("ini", "..\n", &[], &["plugin-name=default"]);

        let outcome = run_scenario(&scenario, &RunnerConfig::new(&game));
        assert_eq!(outcome.verdict, Verdict::Passed, "{:?}", outcome.verdict);
    }

    #[test]
    fn fancy_config_is_staged_when_selected() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), "cat config.ini");
        let scenario = scenario(
            "fancy",
            "..\n",
            &[],
            &["plugin-name=fancy", "mine-symbol=M", "flag-symbol=F"],
        );

        let mut config = RunnerConfig::new(&game);
        config.game_config = GameConfig::fancy();

        let outcome = run_scenario(&scenario, &config);
        assert_eq!(outcome.verdict, Verdict::Passed, "{:?}", outcome.verdict);
    }

    #[test]
    fn exact_mode_compares_whole_output() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), "printf 'a\\nb\\n'");
        let mut scenario = scenario("exact", "..\n", &[], &[]);
        scenario.expected = ExpectedOutput::Exact("a\nb\n".to_string());

        let outcome = run_scenario(&scenario, &RunnerConfig::new(&game));
        assert_eq!(outcome.verdict, Verdict::Passed, "{:?}", outcome.verdict);
    }

    #[test]
    fn exact_mode_is_sensitive_to_trailing_newlines() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), "printf 'a\\nb'");
        let mut scenario = scenario("exact-nl", "..\n", &[], &[]);
        scenario.expected = ExpectedOutput::Exact("a\nb\n".to_string());

        let outcome = run_scenario(&scenario, &RunnerConfig::new(&game));
        assert!(matches!(outcome.verdict, Verdict::Failed { .. }));
    }

    #[test]
    fn staging_is_cleaned_up_after_the_run() {
        let dir = TempDir::new().unwrap();
        // The stub leaks its staging-dir path through stdout so the test can
        // check it is gone afterwards.
        let game = stub_game(dir.path(), "pwd");
        let scenario = scenario("cleanup", "..\n", &[], &["never-matches"]);

        let outcome = run_scenario(&scenario, &RunnerConfig::new(&game));
        let reason = match outcome.verdict {
            Verdict::Failed { reason } => reason,
            other => panic!("expected failure, got {other:?}"),
        };
        // The staged path is the actual line in the mismatch message.
        let staged = reason
            .lines()
            .find(|l| l.contains("got \"/"))
            .and_then(|l| l.split('"').nth(3))
            .expect("staging path in diagnostics");
        assert!(
            !Path::new(staged).exists(),
            "staging dir {staged} survived the run"
        );
    }

    #[test]
    fn suite_runs_in_order() {
        let dir = TempDir::new().unwrap();
        let game = stub_game(dir.path(), "echo ok");
        let scenarios = vec![
            scenario("a", "..\n", &[], &["ok"]),
            scenario("b", "..\n", &[], &["ok"]),
            scenario("c", "..\n", &[], &["nope"]),
        ];

        let outcomes = run_suite(&scenarios, &RunnerConfig::new(&game));
        let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(outcomes[0].passed() && outcomes[1].passed());
        assert!(!outcomes[2].passed());
    }
}
