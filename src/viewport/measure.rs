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

use crate::model::ItemId;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct HeightRecord {
    pub item_id: ItemId,
    pub measured_height: f32,
    pub measured_at: Instant,
}

/// Last real height per rendered item id (message or chunk).
///
/// Writes overwrite; the newest measurement is always the layout truth.
/// Records live until their id leaves the conversation.
#[derive(Debug, Default)]
pub struct HeightMeasurementCache {
    records: HashMap<ItemId, HeightRecord>,
}

impl HeightMeasurementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a measurement taken at `measured_at`. Returns the height it
    /// superseded.
    ///
    /// Heights that are NaN, infinite or not positive are dropped and the
    /// previous record (if any) stays in place.
    pub fn record(&mut self, item_id: ItemId, height: f32, measured_at: Instant) -> Option<f32> {
        if !is_usable_height(height) {
            tracing::warn!(item = %item_id, height, "discarding unusable height measurement");
            return None;
        }
        let previous = self.get(&item_id);
        self.records
            .insert(item_id.clone(), HeightRecord { item_id, measured_height: height, measured_at });
        previous
    }

    #[must_use]
    pub fn get(&self, item_id: &ItemId) -> Option<f32> {
        self.records.get(item_id).map(|r| r.measured_height)
    }

    #[must_use]
    pub fn entry(&self, item_id: &ItemId) -> Option<&HeightRecord> {
        self.records.get(item_id)
    }

    /// Drop every record whose id (or parent message id, for chunks) is no longer live.
    pub fn retain_live(&mut self, live: &HashSet<ItemId>) {
        self.records.retain(|id, _| live.contains(id) || parent_is_live(id, live));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

pub(crate) fn is_usable_height(height: f32) -> bool {
    height.is_finite() && height > 0.0
}

fn parent_is_live(id: &ItemId, live: &HashSet<ItemId>) -> bool {
    id.as_str()
        .rsplit_once("#chunk-")
        .is_some_and(|(parent, _)| live.contains(&ItemId::new(parent)))
}
