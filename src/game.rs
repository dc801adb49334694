//! Contract of the Minesweeper program under test.
//!
//! The game is a black box reached only through its process boundary: one
//! optional board-file argument, line-oriented move commands on stdin, a
//! box-drawn grid rendering on stdout, and a small exit-code taxonomy.

use std::fmt;

/// Exit codes the game must honor.
pub mod exit_codes {
    /// Valid configuration; game played to completion or input exhausted.
    pub const OK: i32 = 0;

    /// No board-configuration argument supplied.
    pub const NO_CONFIG: i32 = 1;

    /// Configuration present but invalid: nonexistent file, directory,
    /// wrong or mixed-case filename suffix, empty file, non-board content,
    /// non-rectangular board, dimensions outside 1..=20, single-cell board,
    /// or a board consisting entirely of mines.
    pub const INVALID_CONFIG: i32 = 2;
}

/// Required suffix for board-configuration files, lower case only.
/// `.CfG`, `.ccfg` and the like are rejected with [`exit_codes::INVALID_CONFIG`].
pub const BOARD_FILE_SUFFIX: &str = ".cfg";

/// Banner printed when every safe square has been revealed.
pub const WIN_BANNER: [&str; 3] = ["╔═══════════╗", "║You Won!   ║", "╚═══════════╝"];

/// Message printed (inside a box-drawn banner) when stdin is exhausted
/// while the game is still in progress.
pub const OUT_OF_INPUT_MESSAGE: &str = "Not enough inputs!";

/// The two move actions the game accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reveal,
    Flag,
}

impl Action {
    /// Single-character action code used on the wire.
    pub fn code(self) -> char {
        match self {
            Action::Reveal => 'R',
            Action::Flag => 'F',
        }
    }
}

/// One move command, rendered as `<row> <col> <action>` with 1-based indices.
///
/// The game tolerates arbitrary whitespace around the numbers; the harness
/// always emits the canonical single-space form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub row: u32,
    pub col: u32,
    pub action: Action,
}

impl Move {
    pub fn reveal(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            action: Action::Reveal,
        }
    }

    pub fn flag(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            action: Action::Flag,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.row, self.col, self.action.code())
    }
}
