//! ANSI color checks for the fancy renderer's numeric hints.
//!
//! The fancy plugin wraps each hint digit in a fixed foreground color. The
//! mapping is total over 1..=8 and nothing else: a board cell can border at
//! most eight mines.

use regex::Regex;
use std::sync::OnceLock;

/// SGR reset emitted after every colored digit.
pub const RESET: &str = "\u{1b}[0m";

const HINT_COLORS: [&str; 8] = [
    "\u{1b}[34m", // 1 blue
    "\u{1b}[32m", // 2 green
    "\u{1b}[31m", // 3 red
    "\u{1b}[35m", // 4 purple
    "\u{1b}[37m", // 5 white
    "\u{1b}[33m", // 6 yellow
    "\u{1b}[90m", // 7 gray
    "\u{1b}[36m", // 8 cyan
];

/// Color-start sequence for a hint digit, or `None` outside 1..=8.
pub fn hint_color(digit: u8) -> Option<&'static str> {
    match digit {
        1..=8 => Some(HINT_COLORS[digit as usize - 1]),
        _ => None,
    }
}

/// True when the text contains any SGR escape sequence at all.
pub fn contains_any_color(text: &str) -> bool {
    static ANY_SGR: OnceLock<Regex> = OnceLock::new();
    let re =
        ANY_SGR.get_or_init(|| Regex::new("\u{1b}\\[[;0-9]*m").expect("SGR regex is valid"));
    re.is_match(text)
}

/// Compiled assertion that a board row shows `digit`, in its color, inside
/// the `column`-th cell (1-based).
///
/// Cells are delimited by the box-drawing bar `│`, which is not the ASCII
/// pipe; the pattern keeps the colored digit inside one cell rather than
/// letting it float across borders.
#[derive(Debug, Clone)]
pub struct ColorPattern {
    pub digit: u8,
    pub column: usize,
    regex: Regex,
}

impl ColorPattern {
    /// Build the pattern; `None` when `digit` has no color (outside 1..=8)
    /// or `column` is zero.
    pub fn new(digit: u8, column: usize) -> Option<Self> {
        let color = hint_color(digit)?;
        if column == 0 {
            return None;
        }
        let cell = "[^│]*";
        let pattern = format!(
            "^(?:│{cell}){{{skip}}}│{cell}{color}{cell}{digit}{cell}{reset}{cell}│.*$",
            skip = column - 1,
            color = regex::escape(color),
            reset = regex::escape(RESET),
        );
        // The pattern is assembled from escaped literals; it always compiles.
        let regex = Regex::new(&pattern).ok()?;
        Some(Self {
            digit,
            column,
            regex,
        })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}
