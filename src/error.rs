// chatview - windowed chat transcript viewport with adaptive auto-scroll
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::PathBuf;

/// Configuration rejected at construction time.
///
/// Anything that would otherwise surface mid-render (a zero chunk size, a NaN
/// estimate) is caught here instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("chunk size must be at least 1 character")]
    ZeroChunkSize,
    #[error("estimated height must be a finite positive number, got {0}")]
    InvalidEstimate(f32),
    #[error("maximum estimated height {max} is below the base estimate {base}")]
    EstimateCeilingTooLow { base: f32, max: f32 },
    #[error("{field} must be a finite non-negative number, got {value}")]
    NegativeLength { field: &'static str, value: f32 },
    #[error("streaming scroll interval must be non-zero")]
    ZeroStreamingInterval,
    #[error("failed to read config file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("failed to parse config file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Invalid viewport configuration")]
    InvalidConfig,
    #[error("Terminal unavailable")]
    TerminalUnavailable,
}

impl AppError {
    pub const INVALID_CONFIG_EXIT_CODE: i32 = 20;
    pub const TERMINAL_UNAVAILABLE_EXIT_CODE: i32 = 21;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig => Self::INVALID_CONFIG_EXIT_CODE,
            Self::TerminalUnavailable => Self::TERMINAL_UNAVAILABLE_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidConfig => {
                "The viewport configuration is invalid. Check --config and the sizing flags."
            }
            Self::TerminalUnavailable => {
                "Could not take over the terminal. Run chatview from an interactive terminal."
            }
        }
    }
}
