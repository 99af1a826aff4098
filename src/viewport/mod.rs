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

//! Framework-free core of the chat transcript viewport.
//!
//! Everything here is driven by the host: it feeds message snapshots, scroll
//! and resize events and measured heights, and polls [`ChatViewport::tick`]
//! once per frame. Time is always passed in, never read.

mod autoscroll;
mod chunk;
mod controller;
mod easing;
mod estimate;
mod measure;
mod render;
mod scheduler;
mod tracker;
mod window;

pub use autoscroll::{AutoScrollState, AutoScrollTask, ScrollMode, ScrollSurface, SmoothAutoScroller};
pub use chunk::{ContentChunk, ContentChunker, Expansion, hidden_chunk_count};
pub use controller::{ChatViewport, ListChange, ScrollContainer, VisibleBlock};
pub use easing::{CubicBezier, interpolate};
pub use estimate::HeightEstimator;
pub use measure::{HeightMeasurementCache, HeightRecord};
pub use render::{MessageRenderer, RenderedMessage};
pub use scheduler::{Scheduler, TimerId};
pub use tracker::{FollowChange, ScrollPositionTracker, ScrollState, is_near_bottom};
pub use window::{VirtualMessageItem, VirtualWindow, WindowLayout, compute_window, select_visible};

/// Events the viewport schedules on its own [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportTimer {
    /// New message entered the list; scroll once it has been laid out.
    AppendDelay,
    StreamingTick,
    AnimationFrame,
    /// Scroll events went quiet for the debounce window.
    ScrollSettled,
}
