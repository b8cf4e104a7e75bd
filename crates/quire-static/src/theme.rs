//! Light/dark theme settings for the viewer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Initial color scheme of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the browser's `prefers-color-scheme`
    #[default]
    System,
    Light,
    Dark,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        };
        f.write_str(name)
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme mode: {}", other)),
        }
    }
}

/// Theme state handed to the viewer page.
///
/// The page script restores the reader's saved choice from `localStorage`
/// under `storage_key`, falls back to `mode`, and saves every toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub storage_key: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            mode: ThemeMode::System,
            storage_key: "theme".to_string(),
        }
    }
}

impl ThemeSettings {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}
