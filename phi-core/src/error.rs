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

//! Error types for buffer I/O and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a text buffer's file operations. These are recoverable: the view
/// turns them into a notice and leaves the pane as it was.
#[derive(Debug, Error)]
pub enum BufferError {
    /// Reading or writing the backing file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Save was requested on a buffer that has no file behind it.
    #[error("buffer has no file path")]
    NoPath,
}

impl BufferError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BufferError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur while loading or bootstrapping the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading or writing a configuration file or directory.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML was malformed or did not match the schema.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The default configuration could not be serialized.
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A colour value was not a `#rrggbb` string.
    #[error("invalid color format: {0}")]
    InvalidColor(String),

    /// The platform has no configuration directory.
    #[error("no configuration directory available")]
    NoConfigDir,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
