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

//! [`ChatViewport`] ties the layout core, the scroll tracker and the
//! auto-scroller to one scroll container and one timer queue.

use super::ViewportTimer;
use super::autoscroll::{AutoScrollState, AutoScrollTask, ScrollSurface, SmoothAutoScroller};
use super::chunk::{ContentChunk, ContentChunker, Expansion};
use super::estimate::HeightEstimator;
use super::measure::{HeightMeasurementCache, is_usable_height};
use super::render::MessageRenderer;
use super::scheduler::Scheduler;
use super::tracker::{FollowChange, ScrollPositionTracker, ScrollState};
use super::window::{
    VirtualMessageItem, VirtualWindow, WindowLayout, apply_height_delta, compute_window,
    select_visible,
};
use crate::config::ViewportConfig;
use crate::error::ConfigError;
use crate::model::{ItemId, MessageItem};
use std::collections::HashSet;
use std::time::Instant;

/// Height changes below this are layout noise, not corrections.
const HEIGHT_EPSILON: f32 = 0.5;

/// Offset and extent of the scrolling element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollContainer {
    pub scroll_top: f32,
    pub viewport_height: f32,
    pub content_height: f32,
    /// Cleared when the host tears the element down under a running animation.
    pub attached: bool,
}

impl Default for ScrollContainer {
    fn default() -> Self {
        Self { scroll_top: 0.0, viewport_height: 0.0, content_height: 0.0, attached: true }
    }
}

impl ScrollContainer {
    #[must_use]
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    fn is_at_tail(&self) -> bool {
        self.scroll_top >= self.max_offset() - HEIGHT_EPSILON
    }

    /// Returns whether the offset had to move.
    fn clamp(&mut self) -> bool {
        let clamped = self.scroll_top.clamp(0.0, self.max_offset());
        let changed = (clamped - self.scroll_top).abs() > f32::EPSILON;
        self.scroll_top = clamped;
        changed
    }
}

impl ScrollSurface for ScrollContainer {
    fn scroll_top(&self) -> Option<f32> {
        self.attached.then_some(self.scroll_top)
    }

    fn max_scroll_top(&self) -> Option<f32> {
        self.attached.then(|| self.max_offset())
    }

    fn set_scroll_top(&mut self, offset: f32) -> bool {
        if !self.attached {
            return false;
        }
        self.scroll_top = offset.clamp(0.0, self.max_offset());
        true
    }
}

/// What changed between two message snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListChange {
    pub appended: usize,
    pub removed: usize,
    /// The previous last message is still streaming and got longer.
    pub tail_grew: bool,
    /// The previous last message stopped streaming (or disappeared mid-stream).
    pub streaming_ended: bool,
}

impl ListChange {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone)]
struct SnapshotEntry {
    id: ItemId,
    len: usize,
    streaming: bool,
}

impl SnapshotEntry {
    fn of(message: &MessageItem) -> Self {
        Self { id: message.id.clone(), len: message.content.len(), streaming: message.is_streaming }
    }
}

fn diff(previous: &[SnapshotEntry], messages: &[MessageItem]) -> ListChange {
    let current: HashSet<&ItemId> = messages.iter().map(|m| &m.id).collect();
    let known: HashSet<&ItemId> = previous.iter().map(|e| &e.id).collect();
    let mut change = ListChange {
        appended: messages.iter().filter(|m| !known.contains(&m.id)).count(),
        removed: previous.iter().filter(|e| !current.contains(&e.id)).count(),
        ..ListChange::default()
    };
    if let Some(tail) = previous.last() {
        match messages.iter().rev().find(|m| m.id == tail.id) {
            Some(message) => {
                change.tail_grew = message.is_streaming && message.content.len() > tail.len;
                change.streaming_ended = tail.streaming && !message.is_streaming;
            }
            None => change.streaming_ended = tail.streaming,
        }
    }
    change
}

/// One drawn item from [`ChatViewport::render_visible`], positioned with the
/// heights measured during that same pass.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleBlock<B> {
    pub position: VirtualMessageItem,
    pub block: B,
}

#[derive(Debug)]
pub struct ChatViewport {
    config: ViewportConfig,
    layout: WindowLayout,
    estimator: HeightEstimator,
    chunker: ContentChunker,
    measurements: HeightMeasurementCache,
    tracker: ScrollPositionTracker,
    scroller: SmoothAutoScroller,
    scheduler: Scheduler<ViewportTimer>,
    container: ScrollContainer,
    window: VirtualWindow,
    snapshot: Vec<SnapshotEntry>,
    torn_down: bool,
}

impl ChatViewport {
    pub fn new(config: ViewportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            layout: WindowLayout::from(&config),
            estimator: HeightEstimator::new(&config),
            chunker: ContentChunker::new(config.chunk)?,
            measurements: HeightMeasurementCache::new(),
            tracker: ScrollPositionTracker::new(
                config.near_bottom_threshold,
                config.scroll.scroll_debounce(),
            ),
            scroller: SmoothAutoScroller::new(config.scroll),
            scheduler: Scheduler::new(),
            container: ScrollContainer::default(),
            window: VirtualWindow::default(),
            snapshot: Vec::new(),
            torn_down: false,
            config,
        })
    }

    // --- message list -------------------------------------------------

    /// Take a new snapshot of the transcript.
    ///
    /// Removed ids lose their measurements and expansion state, the layout is
    /// recomputed, and appends or streaming changes are raised to the
    /// auto-scroller. The follow decision is the one captured at the last
    /// scroll or resize, before the new content changed the scroll height.
    pub fn sync_messages(&mut self, messages: &[MessageItem], now: Instant) -> ListChange {
        if self.torn_down {
            return ListChange::default();
        }
        let change = diff(&self.snapshot, messages);
        if change.removed > 0 {
            let live: HashSet<ItemId> = messages.iter().map(|m| m.id.clone()).collect();
            self.measurements.retain_live(&live);
            self.chunker.retain_live(&live);
        }
        self.snapshot = messages.iter().map(SnapshotEntry::of).collect();
        self.relayout(messages);

        let allowed = self.tracker.allows_auto_scroll();
        if change.streaming_ended {
            let moved = self.scroller.on_streaming_ended(
                now,
                allowed,
                &mut self.container,
                &mut self.scheduler,
            );
            self.after_programmatic_move(now, moved);
        }
        if change.appended > 0 {
            tracing::debug!(appended = change.appended, allowed, "messages appended");
            self.scroller.on_message_appended(now, allowed, &mut self.scheduler);
        }
        if change.tail_grew {
            let moved = self.scroller.on_streaming_growth(
                now,
                allowed,
                &mut self.container,
                &mut self.scheduler,
            );
            self.after_programmatic_move(now, moved);
        }
        change
    }

    /// Recompute every position from measurements and estimates.
    pub fn relayout(&mut self, messages: &[MessageItem]) {
        let old_max = self.container.max_offset();
        let estimator = &self.estimator;
        let chunker = &self.chunker;
        let measurements = &self.measurements;
        self.window = compute_window(
            messages,
            self.container.scroll_top,
            self.container.viewport_height,
            &self.layout,
            |m| estimator.estimate(m, chunker.is_expanded(&m.id), measurements),
        );
        self.container.content_height = self.window.total_height;
        if self.tracker.allows_auto_scroll() {
            self.scroller.retarget_tail(old_max, self.container.max_offset());
        }
        if self.container.clamp() {
            // Content shrank below the offset.
            self.tracker.on_layout_shift(self.container.scroll_top, self.container.content_height);
            self.refresh_visible();
        } else {
            self.tracker.on_content_height(self.container.content_height);
        }
    }

    #[must_use]
    pub fn window(&self) -> &VirtualWindow {
        &self.window
    }

    #[must_use]
    pub fn chunks_for(&self, message: &MessageItem) -> Vec<ContentChunk> {
        self.chunker.chunk(message)
    }

    #[must_use]
    pub fn expansion(&self, id: &ItemId) -> Expansion {
        self.chunker.expansion(id)
    }

    /// Flip "show all" for a chunked message. Its last measurement stays in
    /// place until the next render supersedes it.
    pub fn toggle_expanded(&mut self, id: &ItemId) -> Expansion {
        let expansion = self.chunker.toggle(id);
        tracing::debug!(item = %id, ?expansion, "toggled message expansion");
        expansion
    }

    /// Forget every measurement, e.g. after the render width changed, and
    /// lay out again from estimates. An idle view on the tail stays there.
    pub fn invalidate_measurements(&mut self, messages: &[MessageItem]) {
        tracing::debug!(count = self.measurements.len(), "dropping all height measurements");
        let pin = self.container.is_at_tail()
            && self.tracker.allows_auto_scroll()
            && self.scroller.state() == AutoScrollState::Idle;
        self.measurements.clear();
        self.relayout(messages);
        if pin && !self.container.is_at_tail() {
            self.container.scroll_top = self.container.max_offset();
            self.tracker.on_layout_shift(self.container.scroll_top, self.container.content_height);
            self.refresh_visible();
        }
    }

    // --- measurement --------------------------------------------------

    /// Post-paint measurement from the host, taken at `now`. Returns whether
    /// the layout moved.
    ///
    /// An idle view on the tail while following stays pinned to the tail.
    /// Otherwise a correction to an item entirely above the offset shifts the
    /// offset by the same amount so the visible content stays put, and a
    /// running scroll toward the tail follows the tail.
    pub fn on_measured(&mut self, id: &ItemId, height: f32, now: Instant) -> bool {
        if self.torn_down {
            return false;
        }
        // The cache logs and drops unusable values itself.
        self.measurements.record(id.clone(), height, now);
        if !is_usable_height(height) {
            return false;
        }
        let Some(index) = self.window.positions.iter().position(|p| &p.id == id) else {
            return false;
        };
        let before = &self.window.positions[index];
        if (height - before.height).abs() <= HEIGHT_EPSILON {
            return false;
        }
        let above_offset = before.bottom() <= self.container.scroll_top;
        let was_at_tail = self.container.is_at_tail();
        let old_max = self.container.max_offset();

        let delta = apply_height_delta(&mut self.window, index, height);
        self.container.content_height = self.window.total_height;
        let pinned = was_at_tail
            && self.tracker.allows_auto_scroll()
            && self.scroller.state() == AutoScrollState::Idle;
        if pinned {
            self.container.scroll_top = self.container.max_offset();
        } else {
            if above_offset {
                self.container.scroll_top += delta;
                self.scroller.shift_origin(delta);
                tracing::debug!(item = %id, delta, "anchored offset to measurement correction");
            }
            self.scroller.retarget_tail(old_max, self.container.max_offset());
        }
        self.container.clamp();
        self.tracker.on_layout_shift(self.container.scroll_top, self.container.content_height);
        self.refresh_visible();
        true
    }

    /// Render the visible window and feed every block's height back as a
    /// measurement taken at `now`.
    pub fn render_visible<R: MessageRenderer>(
        &mut self,
        messages: &[MessageItem],
        renderer: &mut R,
        now: Instant,
    ) -> Vec<VisibleBlock<R::Block>> {
        let mut drawn = Vec::with_capacity(self.window.visible.len());
        for index in self.window.visible.clone() {
            let Some(message) = messages.get(index) else {
                continue;
            };
            if self.window.positions.get(index).is_none_or(|p| p.id != message.id) {
                // Snapshot and layout disagree; the next sync fixes it.
                continue;
            }
            let chunks = self.chunker.chunk(message);
            let rendered = renderer.render(message, &chunks);
            self.on_measured(&message.id, rendered.height, now);
            drawn.push((index, rendered.block));
        }
        drawn
            .into_iter()
            .filter_map(|(index, block)| {
                self.window
                    .positions
                    .get(index)
                    .cloned()
                    .map(|position| VisibleBlock { position, block })
            })
            .collect()
    }

    // --- scrolling ----------------------------------------------------

    /// The user moved the offset (wheel, keys, scrollbar). The user's offset
    /// wins over any running auto-scroll task.
    pub fn on_user_scroll(&mut self, now: Instant, offset: f32) -> FollowChange {
        if self.torn_down || !offset.is_finite() {
            return FollowChange::Unchanged;
        }
        let previous = self.container.scroll_top;
        self.container.scroll_top = offset.clamp(0.0, self.container.max_offset());
        let change = self.tracker.on_scroll(
            now,
            self.container.scroll_top,
            self.container.content_height,
            &mut self.scheduler,
        );
        if change == FollowChange::Released {
            self.scroller.on_follow_released(&mut self.scheduler);
        } else if (self.container.scroll_top - previous).abs() > HEIGHT_EPSILON {
            self.scroller.on_user_override(&mut self.scheduler);
        }
        self.refresh_visible();
        change
    }

    pub fn scroll_by(&mut self, now: Instant, delta: f32) -> FollowChange {
        self.on_user_scroll(now, self.container.scroll_top + delta)
    }

    /// The viewport changed size. A view sitting on the tail while following
    /// stays on the tail.
    pub fn on_resize(&mut self, now: Instant, viewport_height: f32) -> FollowChange {
        if self.torn_down || !viewport_height.is_finite() {
            return FollowChange::Unchanged;
        }
        let was_at_tail = self.container.is_at_tail();
        self.container.viewport_height = viewport_height.max(0.0);
        if was_at_tail && self.tracker.allows_auto_scroll() {
            self.container.scroll_top = self.container.max_offset();
        }
        self.container.clamp();
        let change = self.tracker.on_resize(
            now,
            self.container.viewport_height,
            self.container.scroll_top,
            &mut self.scheduler,
        );
        self.refresh_visible();
        change
    }

    /// Scroll-to-bottom control. Runs regardless of follow mode.
    pub fn force_scroll_to_bottom(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        tracing::debug!("forced scroll to bottom");
        let moved = self.scroller.force_to_bottom(now, &mut self.container, &mut self.scheduler);
        self.after_programmatic_move(now, moved);
    }

    /// Run every timer due at `now`. Returns whether the offset moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.torn_down {
            return false;
        }
        let mut moved_any = false;
        for (id, event) in self.scheduler.poll(now) {
            // Handlers earlier in the batch may have superseded this timer.
            if self.tracker.owns_timer(id) {
                self.tracker.settle();
            } else if self.scroller.owns_timer(id) {
                let allowed = self.tracker.allows_auto_scroll();
                let moved = self.scroller.on_timer(
                    id,
                    event,
                    now,
                    allowed,
                    &mut self.container,
                    &mut self.scheduler,
                );
                self.after_programmatic_move(now, moved);
                moved_any |= moved;
            }
        }
        moved_any
    }

    /// Cancel every pending timer and ignore all further input.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.scroller.teardown(&mut self.scheduler);
        self.scheduler.dispose();
        self.torn_down = true;
        tracing::debug!("viewport torn down");
    }

    /// The scroll element went away; any running animation aborts quietly on
    /// its next frame.
    pub fn detach_container(&mut self) {
        self.container.attached = false;
    }

    fn after_programmatic_move(&mut self, now: Instant, moved: bool) {
        if !moved {
            return;
        }
        let change = self.tracker.on_scroll(
            now,
            self.container.scroll_top,
            self.container.content_height,
            &mut self.scheduler,
        );
        if change == FollowChange::Released {
            self.scroller.on_follow_released(&mut self.scheduler);
        }
        self.refresh_visible();
    }

    fn refresh_visible(&mut self) {
        select_visible(
            &mut self.window,
            self.container.scroll_top,
            self.container.viewport_height,
            &self.layout,
        );
    }

    // --- accessors ----------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    #[must_use]
    pub fn scroll_top(&self) -> f32 {
        self.container.scroll_top
    }

    #[must_use]
    pub fn viewport_height(&self) -> f32 {
        self.container.viewport_height
    }

    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.window.total_height
    }

    #[must_use]
    pub fn max_scroll_top(&self) -> f32 {
        self.container.max_offset()
    }

    #[must_use]
    pub fn is_near_bottom(&self) -> bool {
        self.tracker.is_near_bottom()
    }

    #[must_use]
    pub fn allows_auto_scroll(&self) -> bool {
        self.tracker.allows_auto_scroll()
    }

    #[must_use]
    pub fn show_scroll_button(&self) -> bool {
        self.tracker.show_scroll_button()
    }

    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.tracker.state()
    }

    #[must_use]
    pub fn auto_scroll_state(&self) -> AutoScrollState {
        self.scroller.state()
    }

    #[must_use]
    pub fn active_task(&self) -> Option<&AutoScrollTask> {
        self.scroller.active_task()
    }

    #[must_use]
    pub fn measurements(&self) -> &HeightMeasurementCache {
        &self.measurements
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// When the host should call [`Self::tick`] next, if anything is pending.
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.scheduler.next_deadline(now)
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
