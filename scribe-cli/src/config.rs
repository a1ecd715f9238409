//! `scribe.toml` configuration

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scribe_core::{HotkeyTable, MarkType, Platform};

pub const DEFAULT_CONFIG_NAME: &str = "config.toml";

/// How check-list items are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckListStyle {
    /// `[ ]` / `[x]` prefixes
    #[default]
    Boxes,
    /// No prefix; checked items are dimmed
    Plain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub check_list: CheckListStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hotkey overrides, e.g. `"mod+b" = "bold"`. Replaces the built-in
    /// table when non-empty.
    pub hotkeys: BTreeMap<String, MarkType>,
    pub display: DisplayConfig,
}

impl Config {
    /// Load from `path`, or from `~/.scribe/config.toml` when no path is
    /// given. Only the default location may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        // surface bad hotkeys at load time, not on first key press
        config.hotkey_table(Platform::Other)?;
        Ok(config)
    }

    pub fn hotkey_table(&self, platform: Platform) -> Result<HotkeyTable> {
        if self.hotkeys.is_empty() {
            return Ok(HotkeyTable::default_for(platform));
        }
        let pairs = self.hotkeys.iter().map(|(hotkey, mark)| (hotkey.as_str(), *mark));
        Ok(HotkeyTable::from_pairs(pairs, platform)?)
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".scribe").join(DEFAULT_CONFIG_NAME))
}
