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

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod ui;
pub mod viewport;

use crate::config::ViewportConfig;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chatview", about = "Windowed chat transcript with adaptive auto-scroll")]
pub struct Cli {
    /// Messages in the transcript at startup
    #[arg(long, default_value_t = 80)]
    pub seed: usize,

    /// Characters streamed into a reply per frame
    #[arg(long, default_value_t = 12)]
    pub stream_rate: usize,

    /// JSON file overriding viewport settings (terminal rows as units)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Rows from the end that still count as "at the bottom"
    #[arg(long, value_name = "ROWS")]
    pub near_bottom: Option<f32>,

    /// Characters per chunk for long messages
    #[arg(long, value_name = "CHARS")]
    pub chunk_size: Option<usize>,

    /// Write tracing diagnostics to a file (disabled by default)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives, e.g. `info,chatview::viewport=debug`
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to --log-file instead of truncating it
    #[arg(long)]
    pub log_append: bool,
}

impl Cli {
    /// Terminal preset, then `--config`, then individual flags.
    pub fn viewport_config(&self) -> Result<ViewportConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ViewportConfig::terminal().overlay_json_file(path)?,
            None => ViewportConfig::terminal(),
        };
        if let Some(rows) = self.near_bottom {
            config.near_bottom_threshold = rows;
        }
        if let Some(chars) = self.chunk_size {
            config.chunk.chunk_size = chars;
        }
        config.validate()?;
        Ok(config)
    }
}
