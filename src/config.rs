//! The game's `config.ini` settings file.
//!
//! The game reads a key=value settings file from its working directory at
//! startup. Recognized keys: `plugin-name` selects the rendering style,
//! `mine-symbol` and `flag-symbol` override the single-character glyphs in
//! fancy mode.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name the game looks for in its working directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Rendering style selected by `plugin-name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPlugin {
    #[default]
    Default,
    Fancy,
}

impl RenderPlugin {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderPlugin::Default => "default",
            RenderPlugin::Fancy => "fancy",
        }
    }
}

/// Settings written to `config.ini` before each run.
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub plugin: RenderPlugin,
    pub mine_symbol: Option<char>,
    pub flag_symbol: Option<char>,
}

impl GameConfig {
    /// The fancy configuration used by the reference styled-output tests:
    /// `plugin-name=fancy`, mine glyph `M`, flag glyph `F`.
    pub fn fancy() -> Self {
        Self {
            plugin: RenderPlugin::Fancy,
            mine_symbol: Some('M'),
            flag_symbol: Some('F'),
        }
    }

    /// Render the key=value lines, one per line, trailing newline included.
    pub fn to_ini(&self) -> String {
        let mut out = format!("plugin-name={}\n", self.plugin.as_str());
        if let Some(mine) = self.mine_symbol {
            out.push_str(&format!("mine-symbol={mine}\n"));
        }
        if let Some(flag) = self.flag_symbol {
            out.push_str(&format!("flag-symbol={flag}\n"));
        }
        out
    }

    /// Write `config.ini` into `dir`, replacing any previous file, and
    /// return its path.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, self.to_ini())?;
        Ok(path)
    }
}
