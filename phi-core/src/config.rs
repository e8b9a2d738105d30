// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Editor configuration, read from `config.toml`.
//!
//! Every section is optional; missing sections and keys fall back to the defaults.
//!
//! ```toml
//! [editor]
//! close_policy = "prompt"   # or "save", "discard"
//! tab_width = 4
//! show_line_numbers = true
//!
//! [font]
//! face = "monospace"
//! size = 14
//!
//! [theme]
//! background = "#1e1e1e"
//! foreground = "#d4d4d4"
//! cursor = "#aeafad"
//! cursor_invert = "#1e1e1e"
//! gutter_background = "#141414"
//! gutter_foreground = "#858585"
//!
//! [shortcuts.controls]
//! s = "save"
//! w = "close_buffer"
//! ```

use crate::action_registry::{
    ACTION_CLOSE_BUFFER, ACTION_EXIT, ACTION_FOCUS_NEXT, ACTION_FOCUS_PREV, ACTION_NEW_BUFFER,
    ACTION_SAVE, ACTION_TOGGLE_PALETTE,
};
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_DIR_NAME: &str = "phi";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// An RGB colour, written as `"#rrggbb"` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse a hex colour string like "#272822"
    pub fn parse_hex(hex: &str) -> Option<Color> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::rgb(r, g, b))
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value).ok_or(ConfigError::InvalidColor(value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    }
}

/// What closing a pane with unsaved changes does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosePolicy {
    /// Ask, and wait for y (save), n (discard) or Esc (cancel)
    #[default]
    Prompt,
    /// Save, then close. A failed save keeps the pane open.
    Save,
    /// Close without saving
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub close_policy: ClosePolicy,
    /// Spaces inserted for Tab
    pub tab_width: usize,
    pub show_line_numbers: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            close_policy: ClosePolicy::Prompt,
            tab_width: 4,
            show_line_numbers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Empty means use the system monospace font
    pub face: String,
    pub size: u16,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            face: String::new(),
            size: 14,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub cursor: Color,
    pub cursor_invert: Color,
    pub gutter_background: Color,
    pub gutter_foreground: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x1e, 0x1e, 0x1e),
            foreground: Color::rgb(0xd4, 0xd4, 0xd4),
            cursor: Color::rgb(0xae, 0xaf, 0xad),
            cursor_invert: Color::rgb(0x1e, 0x1e, 0x1e),
            gutter_background: Color::rgb(0x14, 0x14, 0x14),
            gutter_foreground: Color::rgb(0x85, 0x85, 0x85),
        }
    }
}

/// Shortcut tables. `controls` maps the character pressed with Control to an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcuts {
    pub controls: BTreeMap<String, String>,
}

impl Shortcuts {
    /// Action bound to Control + `key`, if any.
    pub fn control_action(&self, key: char) -> Option<&str> {
        let mut buf = [0u8; 4];
        let key: &str = key.encode_utf8(&mut buf);
        self.controls.get(key).map(String::as_str)
    }
}

impl Default for Shortcuts {
    fn default() -> Self {
        let controls = [
            ("s", ACTION_SAVE),
            ("w", ACTION_CLOSE_BUFFER),
            ("n", ACTION_NEW_BUFFER),
            ("p", ACTION_TOGGLE_PALETTE),
            ("k", ACTION_FOCUS_NEXT),
            ("j", ACTION_FOCUS_PREV),
            ("q", ACTION_EXIT),
        ]
        .into_iter()
        .map(|(key, action)| (key.to_string(), action.to_string()))
        .collect();
        Self { controls }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
    pub font: FontConfig,
    pub theme: Theme,
    pub shortcuts: Shortcuts,
}

impl Config {
    pub fn from_toml_str(text: &str) -> ConfigResult<Config> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> ConfigResult<Config> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Config::from_toml_str(&text)?;
        info!("Loaded '{}'", path.display());
        Ok(config)
    }

    /// Load `config.toml` from `dir`, creating the directory and writing the default
    /// configuration first if either is missing.
    pub fn load_or_init(dir: &Path) -> ConfigResult<Config> {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            info!("Created config directory '{}'", dir.display());
        }

        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let text = Config::default().to_toml_string()?;
            std::fs::write(&path, text).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            info!("Wrote default config to '{}'", path.display());
        }

        Config::load(&path)
    }

    /// The per-user configuration directory, e.g. `~/.config/phi`.
    pub fn default_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }
}
