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

//! Time-based eased scrolling to the tail of the transcript.
//!
//! Two behaviors share one task slot:
//! - a discrete animation after a new message lands (short delay, ~300ms ease),
//! - a streaming loop that nudges the view to the tail every interval while
//!   the last message grows.
//!
//! At most one [`AutoScrollTask`] exists; starting a new one always cancels
//! the previous one first, so there is a single programmatic scroll writer.

use super::ViewportTimer;
use super::easing::{CubicBezier, interpolate};
use super::scheduler::{Scheduler, TimerId};
use crate::config::ScrollTiming;
use std::time::{Duration, Instant};

/// Offsets this close to the maximum count as the tail.
const TAIL_EPSILON: f32 = 0.5;

/// The scroll container the scroller writes to.
///
/// `None` / `false` mean the container is gone; the running task then aborts
/// without error.
pub trait ScrollSurface {
    fn scroll_top(&self) -> Option<f32>;
    fn max_scroll_top(&self) -> Option<f32>;
    fn set_scroll_top(&mut self, offset: f32) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoScrollState {
    Idle,
    AnimatingDiscrete,
    AnimatingStreaming,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    Discrete,
    /// Re-targets the moving tail on every frame.
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScrollTask {
    pub mode: ScrollMode,
    pub start_time: Instant,
    pub start_offset: f32,
    pub target_offset: f32,
    pub duration: Duration,
}

impl AutoScrollTask {
    /// Normalized time in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn offset_at(&self, curve: &CubicBezier, now: Instant) -> f32 {
        interpolate(curve, self.start_offset, self.target_offset, self.progress(now))
    }
}

#[derive(Debug)]
pub struct SmoothAutoScroller {
    timing: ScrollTiming,
    curve: CubicBezier,
    state: AutoScrollState,
    task: Option<AutoScrollTask>,
    frame_timer: Option<TimerId>,
    append_timer: Option<TimerId>,
    streaming_timer: Option<TimerId>,
    last_growth: Option<Instant>,
}

impl SmoothAutoScroller {
    pub fn new(timing: ScrollTiming) -> Self {
        Self::with_curve(timing, CubicBezier::SCROLL)
    }

    pub fn with_curve(timing: ScrollTiming, curve: CubicBezier) -> Self {
        Self {
            timing,
            curve,
            state: AutoScrollState::Idle,
            task: None,
            frame_timer: None,
            append_timer: None,
            streaming_timer: None,
            last_growth: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> AutoScrollState {
        self.state
    }

    #[must_use]
    pub fn active_task(&self) -> Option<&AutoScrollTask> {
        self.task.as_ref()
    }

    #[must_use]
    pub fn is_streaming_loop_active(&self) -> bool {
        self.streaming_timer.is_some()
    }

    pub(crate) fn owns_timer(&self, id: TimerId) -> bool {
        [self.frame_timer, self.append_timer, self.streaming_timer].contains(&Some(id))
    }

    /// A new message entered the list.
    pub fn on_message_appended(
        &mut self,
        now: Instant,
        allowed: bool,
        sched: &mut Scheduler<ViewportTimer>,
    ) {
        if !allowed {
            return;
        }
        self.cancel_task(sched);
        if let Some(id) = self.append_timer.take() {
            sched.cancel(id);
        }
        // Give the new item a beat to enter layout before measuring the target.
        self.append_timer =
            Some(sched.schedule_once(now, self.timing.append_delay(), ViewportTimer::AppendDelay));
        if self.state != AutoScrollState::AnimatingStreaming {
            self.state = AutoScrollState::AnimatingDiscrete;
        }
    }

    /// The streaming last message grew.
    pub fn on_streaming_growth(
        &mut self,
        now: Instant,
        allowed: bool,
        surface: &mut dyn ScrollSurface,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> bool {
        self.last_growth = Some(now);
        if self.state == AutoScrollState::AnimatingStreaming || !allowed {
            return false;
        }
        tracing::debug!("entering streaming follow loop");
        self.state = AutoScrollState::AnimatingStreaming;
        self.streaming_timer = Some(sched.schedule_interval(
            now,
            self.timing.streaming_interval(),
            ViewportTimer::StreamingTick,
        ));
        if self.task.is_none() && self.append_timer.is_none() {
            return self.start_task(
                ScrollMode::Streaming,
                self.timing.streaming_duration(),
                now,
                surface,
                sched,
            );
        }
        false
    }

    /// The last message stopped streaming: leave the loop with one last
    /// short scroll to the true bottom.
    pub fn on_streaming_ended(
        &mut self,
        now: Instant,
        allowed: bool,
        surface: &mut dyn ScrollSurface,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> bool {
        self.last_growth = None;
        if self.state != AutoScrollState::AnimatingStreaming {
            return false;
        }
        self.stop_streaming_loop(sched);
        self.state = AutoScrollState::AnimatingDiscrete;
        if !allowed {
            self.state = AutoScrollState::Idle;
            return false;
        }
        if self.task.is_some() {
            // Already heading for the tail; let it finish.
            return false;
        }
        self.start_task(ScrollMode::Discrete, self.timing.streaming_duration(), now, surface, sched)
    }

    /// The user scrolled away from the tail. Stop every auto-scroll activity.
    pub fn on_follow_released(&mut self, sched: &mut Scheduler<ViewportTimer>) {
        let was_active = self.state != AutoScrollState::Idle || self.task.is_some();
        self.cancel_task(sched);
        if let Some(id) = self.append_timer.take() {
            sched.cancel(id);
        }
        self.stop_streaming_loop(sched);
        if was_active {
            tracing::debug!("auto-scroll cancelled by user scroll");
            self.state = AutoScrollState::Cancelled;
        }
    }

    /// The user moved the offset under a running task without leaving follow
    /// mode. The task ends where the user put the offset; a streaming loop
    /// keeps ticking from there.
    pub fn on_user_override(&mut self, sched: &mut Scheduler<ViewportTimer>) {
        if self.task.is_none() {
            return;
        }
        tracing::debug!("user scroll overrides running auto-scroll task");
        self.cancel_task(sched);
        self.finish_task();
    }

    /// Scroll-to-bottom control: always runs, whatever the follow state.
    pub fn force_to_bottom(
        &mut self,
        now: Instant,
        surface: &mut dyn ScrollSurface,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> bool {
        if let Some(id) = self.append_timer.take() {
            sched.cancel(id);
        }
        if self.state != AutoScrollState::AnimatingStreaming {
            self.state = AutoScrollState::AnimatingDiscrete;
        }
        self.start_task(ScrollMode::Discrete, self.timing.forced_duration(), now, surface, sched)
    }

    /// Dispatch one of this scroller's timers. Returns whether the offset moved.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        event: ViewportTimer,
        now: Instant,
        allowed: bool,
        surface: &mut dyn ScrollSurface,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> bool {
        match event {
            ViewportTimer::AppendDelay if self.append_timer == Some(id) => {
                self.append_timer = None;
                self.start_task(
                    ScrollMode::Discrete,
                    self.timing.discrete_duration(),
                    now,
                    surface,
                    sched,
                )
            }
            ViewportTimer::StreamingTick if self.streaming_timer == Some(id) => {
                self.on_streaming_tick(now, allowed, surface, sched)
            }
            ViewportTimer::AnimationFrame if self.frame_timer == Some(id) => {
                self.frame_timer = None;
                self.step(now, surface, sched)
            }
            _ => false,
        }
    }

    /// The tail moved from `old_max` to `new_max` (a late measurement, a
    /// relayout). A discrete task that was heading for the old tail follows it.
    pub fn retarget_tail(&mut self, old_max: f32, new_max: f32) {
        if let Some(task) = self.task.as_mut()
            && task.mode == ScrollMode::Discrete
            && task.target_offset >= old_max - TAIL_EPSILON
            && (new_max - task.target_offset).abs() > TAIL_EPSILON
        {
            tracing::debug!(from = task.target_offset, to = new_max, "tail moved; retargeting");
            task.target_offset = new_max;
        }
    }

    /// Content above the offset changed height by `delta` and the offset was
    /// moved with it. The running task starts from the shifted offset so its
    /// next frame does not undo the anchor.
    pub fn shift_origin(&mut self, delta: f32) {
        if let Some(task) = self.task.as_mut() {
            task.start_offset += delta;
        }
    }

    /// Clear every timer and stop for good.
    pub fn teardown(&mut self, sched: &mut Scheduler<ViewportTimer>) {
        self.cancel_task(sched);
        if let Some(id) = self.append_timer.take() {
            sched.cancel(id);
        }
        self.stop_streaming_loop(sched);
        self.state = AutoScrollState::Cancelled;
    }

    fn on_streaming_tick(
        &mut self,
        now: Instant,
        allowed: bool,
        surface: &mut dyn ScrollSurface,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> bool {
        if !allowed {
            self.on_follow_released(sched);
            return false;
        }
        let stalled = self
            .last_growth
            .is_none_or(|at| now.saturating_duration_since(at) >= self.timing.content_settle());
        if stalled {
            tracing::debug!("stream stalled; leaving streaming follow loop");
            return self.on_streaming_ended(now, allowed, surface, sched);
        }
        if self.task.is_some() {
            // Skip rather than queue behind a running animation.
            return false;
        }
        self.start_task(ScrollMode::Streaming, self.timing.streaming_duration(), now, surface, sched)
    }

    /// Replace the active task with a new one heading for the bottom.
    fn start_task(
        &mut self,
        mode: ScrollMode,
        duration: Duration,
        now: Instant,
        surface: &mut dyn ScrollSurface,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> bool {
        self.cancel_task(sched);
        let (Some(current), Some(target)) = (surface.scroll_top(), surface.max_scroll_top()) else {
            self.abort_detached(sched);
            return false;
        };

        let distance = (target - current).abs();
        if distance < self.timing.min_distance {
            let moved = distance > 0.0 && surface.set_scroll_top(target);
            self.finish_task();
            return moved;
        }

        tracing::debug!(?mode, from = current, to = target, ?duration, "starting auto-scroll task");
        self.task = Some(AutoScrollTask {
            mode,
            start_time: now,
            start_offset: current,
            target_offset: target,
            duration,
        });
        self.frame_timer = Some(sched.request_frame(ViewportTimer::AnimationFrame));
        false
    }

    /// Advance the active task by one frame.
    fn step(
        &mut self,
        now: Instant,
        surface: &mut dyn ScrollSurface,
        sched: &mut Scheduler<ViewportTimer>,
    ) -> bool {
        let Some(mut task) = self.task else {
            return false;
        };
        let Some(max) = surface.max_scroll_top() else {
            self.abort_detached(sched);
            return false;
        };
        task.target_offset = match task.mode {
            ScrollMode::Streaming => max,
            ScrollMode::Discrete => task.target_offset.min(max),
        };

        let offset = task.offset_at(&self.curve, now);
        if !surface.set_scroll_top(offset) {
            self.abort_detached(sched);
            return false;
        }

        if task.progress(now) >= 1.0 {
            tracing::debug!(offset, "auto-scroll task finished");
            self.task = None;
            self.finish_task();
        } else {
            self.task = Some(task);
            self.frame_timer = Some(sched.request_frame(ViewportTimer::AnimationFrame));
        }
        true
    }

    fn finish_task(&mut self) {
        if self.state == AutoScrollState::AnimatingDiscrete {
            self.state = AutoScrollState::Idle;
        }
    }

    fn cancel_task(&mut self, sched: &mut Scheduler<ViewportTimer>) {
        if let Some(id) = self.frame_timer.take() {
            sched.cancel(id);
        }
        if let Some(task) = self.task.take() {
            tracing::debug!(mode = ?task.mode, "superseding auto-scroll task");
        }
    }

    fn stop_streaming_loop(&mut self, sched: &mut Scheduler<ViewportTimer>) {
        if let Some(id) = self.streaming_timer.take() {
            sched.cancel(id);
        }
    }

    fn abort_detached(&mut self, sched: &mut Scheduler<ViewportTimer>) {
        tracing::debug!("scroll container gone; aborting auto-scroll");
        self.cancel_task(sched);
        if let Some(id) = self.append_timer.take() {
            sched.cancel(id);
        }
        self.stop_streaming_loop(sched);
        self.state = AutoScrollState::Idle;
    }
}
