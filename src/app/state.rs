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

use super::feed::TranscriptFeed;
use crate::config::ViewportConfig;
use crate::error::ConfigError;
use crate::model::{ItemId, MessageItem};
use crate::viewport::ChatViewport;
use std::time::Instant;

pub struct App {
    pub messages: Vec<MessageItem>,
    pub viewport: ChatViewport,
    pub feed: TranscriptFeed,
    pub should_quit: bool,
    /// Timestamp of the frame being built. Every viewport call made while
    /// drawing uses it.
    pub now: Instant,
    /// Transcript changed since the last sync.
    pub transcript_dirty: bool,
    /// Width the cached measurements were taken at.
    pub measured_width: u16,
}

impl App {
    pub fn new(
        config: ViewportConfig,
        seed: usize,
        stream_rate: usize,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        let mut feed = TranscriptFeed::new(stream_rate);
        let messages = feed.seed(seed);
        Ok(Self {
            messages,
            viewport: ChatViewport::new(config)?,
            feed,
            should_quit: false,
            now,
            transcript_dirty: true,
            measured_width: 0,
        })
    }

    /// Advance the simulated backend and the viewport timers to `now`.
    pub fn advance_frame(&mut self, now: Instant) {
        self.now = now;
        if self.feed.advance(&mut self.messages) {
            self.transcript_dirty = true;
        }
        if self.transcript_dirty {
            self.viewport.sync_messages(&self.messages, now);
            self.transcript_dirty = false;
        }
        self.viewport.tick(now);
    }

    /// Make the viewport match the chat area about to be drawn.
    pub fn fit_viewport(&mut self, width: u16, height: u16) {
        if width != self.measured_width {
            self.measured_width = width;
            self.viewport.invalidate_measurements(&self.messages);
        }
        if (self.viewport.viewport_height() - f32::from(height)).abs() > f32::EPSILON {
            self.viewport.on_resize(self.now, f32::from(height));
        }
    }

    pub fn start_exchange(&mut self) {
        if self.feed.start_exchange(&mut self.messages) {
            self.transcript_dirty = true;
        }
    }

    pub fn push_long_message(&mut self) {
        self.feed.push_long_message(&mut self.messages);
        self.transcript_dirty = true;
    }

    /// Newest message long enough to be split into chunks.
    #[must_use]
    pub fn newest_chunked(&self) -> Option<&ItemId> {
        let threshold = self.viewport.config().chunk.expand_threshold;
        self.messages.iter().rev().find(|m| m.char_len() > threshold).map(|m| &m.id)
    }

    pub fn toggle_newest_expansion(&mut self) {
        let Some(id) = self.newest_chunked().cloned() else {
            return;
        };
        self.viewport.toggle_expanded(&id);
        self.viewport.relayout(&self.messages);
    }
}
