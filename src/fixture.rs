//! Discovery of scenario fixtures from a directory tree.
//!
//! Each immediate subdirectory of the fixture root holds one scenario,
//! described by up to three sibling files that share a name prefix:
//!
//! ```text
//! scenarios/
//!   flood/
//!     flood-board.txt
//!     flood-input.txt
//!     flood-expectedOutput.txt
//! ```
//!
//! The input file is optional (a game run with no moves is a valid test);
//! the board and expected-output files are not. A malformed fixture is
//! skipped and reported, never silently dropped, and never aborts the
//! discovery pass.

use std::fs;
use std::path::{Path, PathBuf};

/// Filename suffix marking the board-configuration file.
pub const BOARD_SUFFIX: &str = "-board.txt";

/// Filename suffix marking the scripted-input file.
pub const INPUT_SUFFIX: &str = "-input.txt";

/// Filename suffix marking the expected-output file.
pub const EXPECTED_SUFFIX: &str = "-expectedOutput.txt";

/// Error type for fixture loading.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: missing board file (*{})", .dir.display(), BOARD_SUFFIX)]
    MissingBoard { dir: PathBuf },

    #[error("{}: missing expected-output file (*{})", .dir.display(), EXPECTED_SUFFIX)]
    MissingExpected { dir: PathBuf },

    #[error("{}: board file is empty", .dir.display())]
    EmptyBoard { dir: PathBuf },
}

/// Expected output of a scenario, at one of the two supported comparison
/// granularities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutput {
    /// Byte-for-byte comparison against the whole captured stdout.
    Exact(String),
    /// Lock-step line comparison, first mismatch reported.
    Lines(Vec<String>),
}

/// One discovered test case. Immutable after discovery; consumed exactly
/// once by the runner.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Shared filename prefix of the fixture files.
    pub name: String,
    /// Directory the fixture was read from.
    pub dir: PathBuf,
    /// Full text of the board-configuration file, staged verbatim.
    pub board: String,
    /// Scripted move commands, one stdin line each, in file order.
    pub inputs: Vec<String>,
    pub expected: ExpectedOutput,
}

/// Outcome of a discovery pass: the well-formed scenarios plus one report
/// per fixture directory that had to be skipped.
#[derive(Debug)]
pub struct Discovery {
    pub scenarios: Vec<Scenario>,
    pub skipped: Vec<FixtureError>,
}

/// Scan the immediate subdirectories of `root` for scenario fixtures.
///
/// Cross-scenario order carries no meaning; scenarios are sorted by name so
/// reports stay stable across filesystems. Line order within a scenario is
/// preserved exactly as read.
pub fn discover(root: &Path) -> Result<Discovery, FixtureError> {
    let entries = fs::read_dir(root).map_err(|source| FixtureError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut scenarios = Vec::new();
    let mut skipped = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|source| FixtureError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        match load_fixture(&dir) {
            Ok(scenario) => scenarios.push(scenario),
            Err(err) => skipped.push(err),
        }
    }

    scenarios.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Discovery { scenarios, skipped })
}

fn load_fixture(dir: &Path) -> Result<Scenario, FixtureError> {
    let mut board_file = None;
    let mut input_file = None;
    let mut expected_file = None;

    let entries = fs::read_dir(dir).map_err(|source| FixtureError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| FixtureError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if file_name.ends_with(BOARD_SUFFIX) {
            board_file = Some(path);
        } else if file_name.ends_with(INPUT_SUFFIX) {
            input_file = Some(path);
        } else if file_name.ends_with(EXPECTED_SUFFIX) {
            expected_file = Some(path);
        }
        // Anything else in the directory is ignored.
    }

    let board_file = board_file.ok_or_else(|| FixtureError::MissingBoard {
        dir: dir.to_path_buf(),
    })?;
    let expected_file = expected_file.ok_or_else(|| FixtureError::MissingExpected {
        dir: dir.to_path_buf(),
    })?;

    let name = scenario_name(&board_file);

    let board = read(&board_file)?;
    if board.trim().is_empty() {
        return Err(FixtureError::EmptyBoard {
            dir: dir.to_path_buf(),
        });
    }

    // No input file means the game is tested with no moves at all.
    let inputs = match input_file {
        Some(path) => read_lines(&path)?,
        None => Vec::new(),
    };

    let expected = ExpectedOutput::Lines(read_lines(&expected_file)?);

    Ok(Scenario {
        name,
        dir: dir.to_path_buf(),
        board,
        inputs,
        expected,
    })
}

/// Scenario name: the filename prefix preceding the first marker delimiter.
fn scenario_name(board_file: &Path) -> String {
    let file_name = board_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.find('-') {
        Some(pos) => file_name[..pos].to_string(),
        None => file_name,
    }
}

fn read(path: &Path) -> Result<String, FixtureError> {
    fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_lines(path: &Path) -> Result<Vec<String>, FixtureError> {
    Ok(read(path)?.lines().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_fixture(root: &Path, dir: &str, files: &[(&str, &str)]) {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        for (name, content) in files {
            fs::write(path.join(name), content).unwrap();
        }
    }

    #[test]
    fn discovers_complete_fixture() {
        let root = TempDir::new().unwrap();
        write_fixture(
            root.path(),
            "win",
            &[
                ("win-board.txt", "..*\n...\n...\n"),
                ("win-input.txt", "1 1 R\n2 2 R\n"),
                ("win-expectedOutput.txt", "line one\nline two\n"),
            ],
        );

        let discovery = discover(root.path()).unwrap();
        assert!(discovery.skipped.is_empty());
        assert_eq!(discovery.scenarios.len(), 1);

        let scenario = &discovery.scenarios[0];
        assert_eq!(scenario.name, "win");
        assert_eq!(scenario.board, "..*\n...\n...\n");
        assert_eq!(scenario.inputs, vec!["1 1 R", "2 2 R"]);
        assert_eq!(
            scenario.expected,
            ExpectedOutput::Lines(vec!["line one".into(), "line two".into()])
        );
    }

    #[test]
    fn missing_input_file_means_empty_input_sequence() {
        let root = TempDir::new().unwrap();
        write_fixture(
            root.path(),
            "silent",
            &[
                ("silent-board.txt", "..*\n"),
                ("silent-expectedOutput.txt", "out\n"),
            ],
        );

        let discovery = discover(root.path()).unwrap();
        assert_eq!(discovery.scenarios.len(), 1);
        assert!(discovery.scenarios[0].inputs.is_empty());
    }

    #[test]
    fn missing_board_skips_fixture_with_report() {
        let root = TempDir::new().unwrap();
        write_fixture(
            root.path(),
            "broken",
            &[("broken-expectedOutput.txt", "out\n")],
        );
        write_fixture(
            root.path(),
            "fine",
            &[
                ("fine-board.txt", "..\n"),
                ("fine-expectedOutput.txt", "out\n"),
            ],
        );

        let discovery = discover(root.path()).unwrap();
        assert_eq!(discovery.scenarios.len(), 1);
        assert_eq!(discovery.scenarios[0].name, "fine");
        assert_eq!(discovery.skipped.len(), 1);
        assert!(matches!(
            discovery.skipped[0],
            FixtureError::MissingBoard { .. }
        ));
    }

    #[test]
    fn missing_expected_output_skips_fixture() {
        let root = TempDir::new().unwrap();
        write_fixture(root.path(), "noexp", &[("noexp-board.txt", "..\n")]);

        let discovery = discover(root.path()).unwrap();
        assert!(discovery.scenarios.is_empty());
        assert!(matches!(
            discovery.skipped[0],
            FixtureError::MissingExpected { .. }
        ));
    }

    #[test]
    fn whitespace_only_board_is_rejected() {
        let root = TempDir::new().unwrap();
        write_fixture(
            root.path(),
            "blank",
            &[
                ("blank-board.txt", "\n\n"),
                ("blank-expectedOutput.txt", "out\n"),
            ],
        );

        let discovery = discover(root.path()).unwrap();
        assert!(discovery.scenarios.is_empty());
        assert!(matches!(
            discovery.skipped[0],
            FixtureError::EmptyBoard { .. }
        ));
    }

    #[test]
    fn name_stops_at_first_marker_delimiter() {
        let root = TempDir::new().unwrap();
        write_fixture(
            root.path(),
            "multi",
            &[
                ("flood-big-board.txt", "..\n"),
                ("flood-big-expectedOutput.txt", "out\n"),
            ],
        );

        let discovery = discover(root.path()).unwrap();
        assert_eq!(discovery.scenarios[0].name, "flood");
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let root = TempDir::new().unwrap();
        write_fixture(
            root.path(),
            "extra",
            &[
                ("extra-board.txt", "..\n"),
                ("extra-expectedOutput.txt", "out\n"),
                ("README", "notes about this fixture"),
            ],
        );
        fs::write(root.path().join("stray.txt"), "not a fixture dir").unwrap();

        let discovery = discover(root.path()).unwrap();
        assert_eq!(discovery.scenarios.len(), 1);
        assert!(discovery.skipped.is_empty());
    }

    #[test]
    fn scenarios_are_sorted_by_name() {
        let root = TempDir::new().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            write_fixture(
                root.path(),
                name,
                &[
                    (&format!("{name}-board.txt"), "..\n"),
                    (&format!("{name}-expectedOutput.txt"), "out\n"),
                ],
            );
        }

        let discovery = discover(root.path()).unwrap();
        let names: Vec<&str> = discovery.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn missing_root_is_a_hard_error() {
        let err = discover(Path::new("/nonexistent/fixture/root")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }

    #[test]
    fn input_line_order_is_preserved() {
        let root = TempDir::new().unwrap();
        write_fixture(
            root.path(),
            "order",
            &[
                ("order-board.txt", "..\n"),
                ("order-input.txt", "3 1 R\n1 1 F\n2 2 R\n"),
                ("order-expectedOutput.txt", "out\n"),
            ],
        );

        let discovery = discover(root.path()).unwrap();
        assert_eq!(
            discovery.scenarios[0].inputs,
            vec!["3 1 R", "1 1 F", "2 2 R"]
        );
    }
}
