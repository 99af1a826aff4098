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

//! Tuned constants for windowing, chunking and auto-scroll.
//!
//! The timing values are empirically tuned UX numbers, kept as defaults rather
//! than derived. Every struct deserializes with `#[serde(default)]` so a JSON
//! file only needs the fields it overrides.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ESTIMATED_HEIGHT: f32 = 150.0;
pub const DEFAULT_MAX_ESTIMATED_HEIGHT: f32 = 800.0;
pub const DEFAULT_ITEM_GAP: f32 = 16.0;
pub const DEFAULT_TOP_PADDING: f32 = 16.0;
pub const DEFAULT_BOTTOM_PADDING: f32 = 16.0;
pub const DEFAULT_BUFFER_ITEMS: usize = 5;
pub const DEFAULT_WINDOWING_THRESHOLD: usize = 50;
pub const DEFAULT_NEAR_BOTTOM_THRESHOLD: f32 = 100.0;

pub const DEFAULT_EXPAND_THRESHOLD_CHARS: usize = 3000;
pub const DEFAULT_CHUNK_SIZE_CHARS: usize = 2000;
pub const DEFAULT_INITIAL_CHUNKS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkPolicy {
    /// Messages at or below this many characters are never split.
    pub expand_threshold: usize,
    pub chunk_size: usize,
    /// Chunks shown before "show all" is toggled.
    pub initial_chunks: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            expand_threshold: DEFAULT_EXPAND_THRESHOLD_CHARS,
            chunk_size: DEFAULT_CHUNK_SIZE_CHARS,
            initial_chunks: DEFAULT_INITIAL_CHUNKS,
        }
    }
}

impl ChunkPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        Ok(())
    }

    /// Characters rendered while a chunked message is collapsed.
    #[must_use]
    pub fn collapsed_chars(&self) -> usize {
        self.chunk_size.saturating_mul(self.initial_chunks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollTiming {
    /// Wait after an append so the new item enters layout before scrolling.
    pub append_delay_ms: u64,
    pub discrete_duration_ms: u64,
    pub streaming_interval_ms: u64,
    pub streaming_duration_ms: u64,
    pub forced_duration_ms: u64,
    /// Scrolls shorter than this snap instead of animating.
    pub min_distance: f32,
    pub scroll_debounce_ms: u64,
    /// A streaming message that stops growing for this long ends the follow loop.
    pub content_settle_ms: u64,
}

impl Default for ScrollTiming {
    fn default() -> Self {
        Self {
            append_delay_ms: 50,
            discrete_duration_ms: 300,
            streaming_interval_ms: 100,
            streaming_duration_ms: 150,
            forced_duration_ms: 450,
            min_distance: 5.0,
            scroll_debounce_ms: 16,
            content_settle_ms: 250,
        }
    }
}

impl ScrollTiming {
    #[must_use]
    pub fn append_delay(&self) -> Duration {
        Duration::from_millis(self.append_delay_ms)
    }

    #[must_use]
    pub fn discrete_duration(&self) -> Duration {
        Duration::from_millis(self.discrete_duration_ms)
    }

    #[must_use]
    pub fn streaming_interval(&self) -> Duration {
        Duration::from_millis(self.streaming_interval_ms)
    }

    #[must_use]
    pub fn streaming_duration(&self) -> Duration {
        Duration::from_millis(self.streaming_duration_ms)
    }

    #[must_use]
    pub fn forced_duration(&self) -> Duration {
        Duration::from_millis(self.forced_duration_ms)
    }

    #[must_use]
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    #[must_use]
    pub fn content_settle(&self) -> Duration {
        Duration::from_millis(self.content_settle_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub estimated_height: f32,
    pub max_estimated_height: f32,
    pub gap: f32,
    pub top_padding: f32,
    pub bottom_padding: f32,
    /// Extra items of slack rendered above and below the viewport.
    pub buffer_items: usize,
    /// Lists with at most this many items skip windowing and render everything.
    pub windowing_threshold: usize,
    pub near_bottom_threshold: f32,
    pub chunk: ChunkPolicy,
    pub scroll: ScrollTiming,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            estimated_height: DEFAULT_ESTIMATED_HEIGHT,
            max_estimated_height: DEFAULT_MAX_ESTIMATED_HEIGHT,
            gap: DEFAULT_ITEM_GAP,
            top_padding: DEFAULT_TOP_PADDING,
            bottom_padding: DEFAULT_BOTTOM_PADDING,
            buffer_items: DEFAULT_BUFFER_ITEMS,
            windowing_threshold: DEFAULT_WINDOWING_THRESHOLD,
            near_bottom_threshold: DEFAULT_NEAR_BOTTOM_THRESHOLD,
            chunk: ChunkPolicy::default(),
            scroll: ScrollTiming::default(),
        }
    }
}

impl ViewportConfig {
    /// Same behavior scaled to terminal rows instead of pixels.
    #[must_use]
    pub fn terminal() -> Self {
        Self {
            estimated_height: 4.0,
            max_estimated_height: 60.0,
            gap: 1.0,
            top_padding: 0.0,
            bottom_padding: 0.0,
            near_bottom_threshold: 3.0,
            scroll: ScrollTiming { min_distance: 0.5, ..ScrollTiming::default() },
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        Self::default().overlay_json_file(path)
    }

    /// Apply the fields present in a JSON file on top of `self`.
    pub fn overlay_json_file(&self, path: &Path) -> Result<Self, ConfigError> {
        let malformed = |e: serde_json::Error| ConfigError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let overrides: serde_json::Value = serde_json::from_str(&content).map_err(malformed)?;
        let mut merged = serde_json::to_value(self).map_err(malformed)?;
        merge_json(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged).map_err(malformed)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunk.validate()?;
        if !self.estimated_height.is_finite() || self.estimated_height <= 0.0 {
            return Err(ConfigError::InvalidEstimate(self.estimated_height));
        }
        if !self.max_estimated_height.is_finite()
            || self.max_estimated_height < self.estimated_height
        {
            return Err(ConfigError::EstimateCeilingTooLow {
                base: self.estimated_height,
                max: self.max_estimated_height,
            });
        }
        for (field, value) in [
            ("gap", self.gap),
            ("top_padding", self.top_padding),
            ("bottom_padding", self.bottom_padding),
            ("near_bottom_threshold", self.near_bottom_threshold),
            ("scroll.min_distance", self.scroll.min_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeLength { field, value });
            }
        }
        if self.scroll.streaming_interval_ms == 0 {
            return Err(ConfigError::ZeroStreamingInterval);
        }
        Ok(())
    }
}

/// Objects merge key by key; anything else replaces.
fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
