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

//! Owned timer queue for one viewport.
//!
//! Nothing here spawns or sleeps: the host calls [`Scheduler::poll`] once per
//! frame with the current time and dispatches whatever came due. Dropping or
//! disposing the scheduler is therefore enough to guarantee that no timer
//! fires after teardown.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    At(Instant),
    /// Next poll, whatever its time.
    NextFrame,
}

#[derive(Debug)]
struct Timer<E> {
    id: TimerId,
    due: Due,
    period: Option<Duration>,
    event: E,
}

#[derive(Debug)]
pub struct Scheduler<E> {
    next_id: u64,
    timers: Vec<Timer<E>>,
    disposed: bool,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self { next_id: 0, timers: Vec::new(), disposed: false }
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` once, `delay` after `now`.
    pub fn schedule_once(&mut self, now: Instant, delay: Duration, event: E) -> TimerId {
        self.insert(Due::At(now + delay), None, event)
    }

    /// Fire `event` every `period`, first at `now + period`.
    pub fn schedule_interval(&mut self, now: Instant, period: Duration, event: E) -> TimerId {
        self.insert(Due::At(now + period), Some(period), event)
    }

    /// Fire `event` on the next poll.
    pub fn request_frame(&mut self, event: E) -> TimerId {
        self.insert(Due::NextFrame, None, event)
    }

    fn insert(&mut self, due: Due, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        if !self.disposed {
            self.timers.push(Timer { id, due, period, event });
        }
        id
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Collect every event due at `now`, earliest first.
    ///
    /// Intervals fire at most once per poll and re-arm one period after `now`,
    /// so a late poll skips missed ticks instead of replaying them.
    pub fn poll(&mut self, now: Instant) -> Vec<(TimerId, E)> {
        let mut due: Vec<(Option<Instant>, TimerId, E)> = Vec::new();
        self.timers.retain_mut(|timer| {
            let fire_at = match timer.due {
                Due::NextFrame => None,
                Due::At(at) if at <= now => Some(at),
                Due::At(_) => return true,
            };
            due.push((fire_at, timer.id, timer.event.clone()));
            match timer.period {
                Some(period) => {
                    timer.due = Due::At(now + period);
                    true
                }
                None => false,
            }
        });
        // Frames sort ahead of timers; ties keep registration order.
        due.sort_by_key(|(at, id, _)| (*at, *id));
        due.into_iter().map(|(_, id, event)| (id, event)).collect()
    }

    /// Earliest instant anything is due, for hosts that sleep between polls.
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.timers
            .iter()
            .map(|t| match t.due {
                Due::At(at) => at,
                Due::NextFrame => now,
            })
            .min()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// Clear every timer and refuse new ones.
    pub fn dispose(&mut self) {
        self.timers.clear();
        self.disposed = true;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
