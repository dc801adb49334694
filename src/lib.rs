//! Black-box acceptance harness for console Minesweeper implementations.
//!
//! The game under test is an external program reached only through its
//! process boundary: it takes an optional board-configuration path as its
//! sole argument, reads `<row> <col> <action>` move commands from stdin,
//! renders a box-drawn grid on stdout, and signals configuration problems
//! through a small exit-code taxonomy. This crate discovers fixture
//! scenarios from a directory tree, drives the game once per scenario, and
//! compares the captured output exactly, line-by-line, or through ANSI
//! color patterns for the fancy rendering variant.

pub mod colors;
pub mod compare;
pub mod config;
pub mod driver;
pub mod fixture;
pub mod game;
pub mod parallel;
pub mod report;
pub mod runner;
