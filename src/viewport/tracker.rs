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

use super::ViewportTimer;
use super::scheduler::{Scheduler, TimerId};
use std::time::{Duration, Instant};

/// Ignores sub-unit float jitter when comparing offsets and heights.
const SCROLL_DELTA_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    pub scroll_top: f32,
    pub container_height: f32,
    pub scroll_height: f32,
    pub is_near_bottom: bool,
    pub is_user_scrolling: bool,
}

/// Strictly closer than `threshold` to the end of content.
pub fn is_near_bottom(scroll_height: f32, scroll_top: f32, viewport_height: f32, threshold: f32) -> bool {
    scroll_height - scroll_top - viewport_height < threshold
}

/// How a scroll or resize event changed the follow decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowChange {
    Unchanged,
    /// The view came back to the tail; auto-scroll may run again.
    Resumed,
    /// The user moved away from the tail; auto-scroll must stop.
    Released,
}

/// Observes scroll offsets from any source and decides whether auto-scroll
/// is allowed.
///
/// `is_near_bottom` is recomputed eagerly on every event. The scroll-to-bottom
/// button and `is_user_scrolling` only change once events settle.
#[derive(Debug)]
pub struct ScrollPositionTracker {
    state: ScrollState,
    threshold: f32,
    debounce: Duration,
    following: bool,
    show_scroll_button: bool,
    settle_timer: Option<TimerId>,
}

impl ScrollPositionTracker {
    pub fn new(threshold: f32, debounce: Duration) -> Self {
        Self {
            state: ScrollState { is_near_bottom: true, ..ScrollState::default() },
            threshold,
            debounce,
            following: true,
            show_scroll_button: false,
            settle_timer: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    #[must_use]
    pub fn is_near_bottom(&self) -> bool {
        self.state.is_near_bottom
    }

    /// Follow flag read by the auto-scroller.
    #[must_use]
    pub fn allows_auto_scroll(&self) -> bool {
        self.following
    }

    #[must_use]
    pub fn show_scroll_button(&self) -> bool {
        self.show_scroll_button
    }

    /// A scroll offset landed, from the user or from an animation.
    pub fn on_scroll(
        &mut self,
        now: Instant,
        scroll_top: f32,
        scroll_height: f32,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> FollowChange {
        let moved_up = scroll_top < self.state.scroll_top - SCROLL_DELTA_EPSILON;
        let content_changed = (scroll_height - self.state.scroll_height).abs() > SCROLL_DELTA_EPSILON;

        self.state.scroll_top = scroll_top;
        self.state.scroll_height = scroll_height;
        self.recompute_near_bottom();
        self.mark_scrolling(now, sched);

        if self.state.is_near_bottom {
            self.set_following(true)
        } else if moved_up && !content_changed {
            // Only a manual move away from the tail pauses follow mode.
            self.set_following(false)
        } else {
            FollowChange::Unchanged
        }
    }

    /// The viewport changed size. Never releases follow mode.
    pub fn on_resize(
        &mut self,
        now: Instant,
        container_height: f32,
        scroll_top: f32,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> FollowChange {
        self.state.container_height = container_height;
        self.state.scroll_top = scroll_top;
        self.recompute_near_bottom();
        self.mark_scrolling(now, sched);
        if self.state.is_near_bottom { self.set_following(true) } else { FollowChange::Unchanged }
    }

    /// Content height changed without a scroll event.
    ///
    /// `is_near_bottom` keeps the value from the last scroll or resize, so an
    /// append is judged against the layout the user last saw.
    pub fn on_content_height(&mut self, scroll_height: f32) {
        self.state.scroll_height = scroll_height;
    }

    /// The offset was moved by a layout correction rather than a scroll.
    /// Neither the follow flag nor the debounce is touched.
    pub fn on_layout_shift(&mut self, scroll_top: f32, scroll_height: f32) {
        self.state.scroll_top = scroll_top;
        self.state.scroll_height = scroll_height;
    }

    /// Debounce elapsed: publish the visual state.
    pub fn settle(&mut self) {
        self.settle_timer = None;
        self.state.is_user_scrolling = false;
        let show = !self.state.is_near_bottom;
        if show != self.show_scroll_button {
            tracing::debug!(show, "scroll-to-bottom button visibility changed");
        }
        self.show_scroll_button = show;
    }

    pub(crate) fn owns_timer(&self, id: TimerId) -> bool {
        self.settle_timer == Some(id)
    }

    fn recompute_near_bottom(&mut self) {
        self.state.is_near_bottom = is_near_bottom(
            self.state.scroll_height,
            self.state.scroll_top,
            self.state.container_height,
            self.threshold,
        );
    }

    fn mark_scrolling(&mut self, now: Instant, sched: &mut Scheduler<ViewportTimer>) {
        self.state.is_user_scrolling = true;
        if let Some(id) = self.settle_timer.take() {
            sched.cancel(id);
        }
        self.settle_timer = Some(sched.schedule_once(now, self.debounce, ViewportTimer::ScrollSettled));
    }

    fn set_following(&mut self, following: bool) -> FollowChange {
        if self.following == following {
            return FollowChange::Unchanged;
        }
        self.following = following;
        tracing::debug!(following, "auto-scroll follow mode changed");
        if following { FollowChange::Resumed } else { FollowChange::Released }
    }
}
