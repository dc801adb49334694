//! Acceptance harness CLI for console Minesweeper implementations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use sweeptest::config::GameConfig;
use sweeptest::driver::DEFAULT_TIMEOUT_MS;
use sweeptest::fixture;
use sweeptest::parallel::{run_parallel, ParallelConfig};
use sweeptest::report::SuiteReport;
use sweeptest::runner::RunnerConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "sweeptest")]
#[command(version = VERSION)]
#[command(about = "Acceptance harness for console Minesweeper implementations", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every scenario under a fixture directory against the game.
    #[command(name = "run")]
    Run {
        /// Directory whose subdirectories hold the scenario fixtures.
        #[arg(value_name = "DIR")]
        scenarios: PathBuf,

        /// Path to the game executable under test.
        #[arg(short, long, value_name = "FILE")]
        program: PathBuf,

        /// Per-scenario timeout in milliseconds.
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,

        /// Worker count; defaults to the available parallelism.
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Stop launching scenarios after the first failure.
        #[arg(long)]
        fail_fast: bool,

        /// Stage the fancy plugin configuration instead of the default one.
        #[arg(long)]
        fancy: bool,

        /// Emit the report as JSON instead of the human rendering.
        #[arg(long)]
        json: bool,
    },

    /// List the scenarios a fixture directory provides.
    #[command(name = "list")]
    List {
        #[arg(value_name = "DIR")]
        scenarios: PathBuf,
    },

    /// Check that every fixture in a directory is well-formed.
    #[command(name = "validate")]
    Validate {
        #[arg(value_name = "DIR")]
        scenarios: PathBuf,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => {
            if (0..=255).contains(&code) {
                ExitCode::from(code as u8)
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<i32> {
    let args = Args::parse();

    match args.command {
        Command::Run {
            scenarios,
            program,
            timeout_ms,
            jobs,
            fail_fast,
            fancy,
            json,
        } => cmd_run(
            scenarios,
            program,
            timeout_ms,
            jobs,
            fail_fast,
            fancy,
            json,
            args.verbose,
        ),
        Command::List { scenarios } => cmd_list(scenarios).map(|_| 0),
        Command::Validate { scenarios } => cmd_validate(scenarios),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    scenarios_dir: PathBuf,
    program: PathBuf,
    timeout_ms: u64,
    jobs: Option<usize>,
    fail_fast: bool,
    fancy: bool,
    json: bool,
    verbose: bool,
) -> Result<i32> {
    if verbose {
        eprintln!("Discovering scenarios under {}", scenarios_dir.display());
    }

    let discovery = fixture::discover(&scenarios_dir)
        .with_context(|| format!("failed to scan {}", scenarios_dir.display()))?;

    for skipped in &discovery.skipped {
        eprintln!("Warning: skipped fixture: {skipped}");
    }

    if verbose {
        eprintln!("Scenarios: {}", discovery.scenarios.len());
        eprintln!("Program: {}", program.display());
    }

    let mut runner_config = RunnerConfig::new(program);
    runner_config.timeout = Duration::from_millis(timeout_ms);
    runner_config.verbose = verbose;
    if fancy {
        runner_config.game_config = GameConfig::fancy();
    }

    let mut parallel_config = ParallelConfig {
        fail_fast,
        ..ParallelConfig::default()
    };
    if let Some(jobs) = jobs {
        parallel_config.max_workers = jobs.max(1);
    }

    let start = Instant::now();
    let outcomes = run_parallel(&discovery.scenarios, &runner_config, &parallel_config);
    let report = SuiteReport::new(&outcomes, start.elapsed());

    if json {
        println!("{}", report.to_json().context("failed to encode report")?);
    } else {
        print!("{}", report.render_human());
    }

    // Skipped-at-discovery fixtures also fail the run: a broken fixture is
    // a suite defect, not a pass.
    let ok = report.success() && discovery.skipped.is_empty();
    Ok(if ok { 0 } else { 1 })
}

fn cmd_list(scenarios_dir: PathBuf) -> Result<()> {
    let discovery = fixture::discover(&scenarios_dir)
        .with_context(|| format!("failed to scan {}", scenarios_dir.display()))?;

    for scenario in &discovery.scenarios {
        println!(
            "{}  ({} input line{}, {})",
            scenario.name,
            scenario.inputs.len(),
            if scenario.inputs.len() == 1 { "" } else { "s" },
            match &scenario.expected {
                fixture::ExpectedOutput::Exact(_) => "exact".to_string(),
                fixture::ExpectedOutput::Lines(lines) =>
                    format!("{} expected lines", lines.len()),
            }
        );
    }
    for skipped in &discovery.skipped {
        println!("skipped: {skipped}");
    }
    Ok(())
}

fn cmd_validate(scenarios_dir: PathBuf) -> Result<i32> {
    let discovery = fixture::discover(&scenarios_dir)
        .with_context(|| format!("failed to scan {}", scenarios_dir.display()))?;

    println!("Well-formed scenarios: {}", discovery.scenarios.len());
    if discovery.skipped.is_empty() {
        println!("All fixtures are well-formed.");
        Ok(0)
    } else {
        println!("Malformed fixtures:");
        for skipped in &discovery.skipped {
            println!("  - {skipped}");
        }
        Ok(1)
    }
}
