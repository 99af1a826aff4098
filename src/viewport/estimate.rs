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

use super::measure::HeightMeasurementCache;
use crate::config::{ChunkPolicy, ViewportConfig};
use crate::model::MessageItem;

/// Height guess for items that have not been measured yet.
#[derive(Debug, Clone, Copy)]
pub struct HeightEstimator {
    base: f32,
    max: f32,
    policy: ChunkPolicy,
}

impl HeightEstimator {
    pub fn new(config: &ViewportConfig) -> Self {
        Self { base: config.estimated_height, max: config.max_estimated_height, policy: config.chunk }
    }

    #[must_use]
    pub fn base(&self) -> f32 {
        self.base
    }

    /// Measured height when one exists, otherwise the content-based guess.
    pub fn estimate(
        &self,
        item: &MessageItem,
        expanded: bool,
        measurements: &HeightMeasurementCache,
    ) -> f32 {
        measurements.get(&item.id).unwrap_or_else(|| self.estimate_unmeasured(item, expanded))
    }

    /// Scales with the rendered character count once a message is long enough
    /// to be chunked, capped so one huge message cannot skew the window.
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate_unmeasured(&self, item: &MessageItem, expanded: bool) -> f32 {
        let len = item.char_len();
        if len <= self.policy.expand_threshold || self.policy.expand_threshold == 0 {
            return self.base;
        }
        // Collapsed messages only render their first chunks.
        let rendered = if item.is_streaming || expanded {
            len
        } else {
            len.min(self.policy.collapsed_chars())
        };
        let scaled = self.base * rendered as f32 / self.policy.expand_threshold as f32;
        scaled.clamp(self.base, self.max)
    }
}
