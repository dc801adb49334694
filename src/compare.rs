//! Output comparison for captured game transcripts.
//!
//! Three granularities: whole-string equality, lock-step line comparison
//! reporting the first diverging line, and regex patterns applied to a
//! single addressed output line (used for the colored variant). Every
//! comparison stops at the first difference; nothing is aggregated.

use regex::Regex;
use std::fmt;

/// First detected difference between expected and actual output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Whole-output equality failed.
    Text { expected: String, actual: String },
    /// Corresponding lines diverge; `line` is 1-based.
    Line {
        line: usize,
        expected: String,
        actual: String,
    },
    /// Every shared line matched but one side has more lines.
    LineCount { expected: usize, actual: usize },
    /// The addressed line exists but does not match the pattern; `line` is
    /// 0-based, as addressed.
    Pattern {
        line: usize,
        pattern: String,
        actual: String,
    },
    /// The addressed line does not exist in the output.
    MissingLine { line: usize, have: usize },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Text { expected, actual } => write!(
                f,
                "output differs from expected text\nexpected: {expected:?}\nactual:   {actual:?}"
            ),
            Mismatch::Line {
                line,
                expected,
                actual,
            } => write!(
                f,
                "wrong output on line {line}: expected {expected:?}, got {actual:?}"
            ),
            Mismatch::LineCount { expected, actual } => write!(
                f,
                "output has {actual} lines where {expected} were expected"
            ),
            Mismatch::Pattern {
                line,
                pattern,
                actual,
            } => write!(
                f,
                "line {line} does not match /{pattern}/: {actual:?}"
            ),
            Mismatch::MissingLine { line, have } => {
                write!(f, "output has only {have} lines, no line {line}")
            }
        }
    }
}

/// Exact-text mode: byte-for-byte equality, trailing newlines included.
pub fn compare_text(expected: &str, actual: &str) -> Result<(), Mismatch> {
    if expected == actual {
        Ok(())
    } else {
        Err(Mismatch::Text {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Line-by-line mode: iterate both sequences in lock-step and report the
/// first index (1-based) at which they differ.
///
/// When every shared line matches but the sequences have different lengths,
/// a [`Mismatch::LineCount`] is reported rather than silently accepting the
/// longer side's tail.
pub fn compare_lines<E, A>(expected: &[E], actual: &[A]) -> Result<(), Mismatch>
where
    E: AsRef<str>,
    A: AsRef<str>,
{
    for (index, (want, got)) in expected.iter().zip(actual.iter()).enumerate() {
        let (want, got) = (want.as_ref(), got.as_ref());
        if want != got {
            return Err(Mismatch::Line {
                line: index + 1,
                expected: want.to_string(),
                actual: got.to_string(),
            });
        }
    }
    if expected.len() != actual.len() {
        return Err(Mismatch::LineCount {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    Ok(())
}

/// Pattern mode: the 0-indexed `line` of `output` must match `pattern`.
pub fn assert_line_matches(output: &str, line: usize, pattern: &Regex) -> Result<(), Mismatch> {
    let lines: Vec<&str> = output.lines().collect();
    let Some(target) = lines.get(line) else {
        return Err(Mismatch::MissingLine {
            line,
            have: lines.len(),
        });
    };
    if pattern.is_match(target) {
        Ok(())
    } else {
        Err(Mismatch::Pattern {
            line,
            pattern: pattern.as_str().to_string(),
            actual: (*target).to_string(),
        })
    }
}
