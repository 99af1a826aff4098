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

//! Deterministic stand-in for a chat backend: seeded history, user prompts
//! and token-by-token assistant replies.

use crate::model::{ItemId, MessageItem, MessageRole};

const WORDS: &[&str] = &[
    "viewport", "scroll", "render", "window", "measure", "stream", "token", "layout", "buffer",
    "anchor", "offset", "tail", "chunk", "height", "estimate", "frame", "easing", "cursor",
    "message", "reply", "the", "a", "of", "to", "and", "is", "in", "it", "with", "for", "when",
    "every", "until", "after", "before", "keeps", "moves", "grows", "settles", "waits",
];

/// Words per paragraph in generated text.
const PARAGRAPH_WORDS: usize = 48;

/// Size of the message `b` appends; large enough to be chunked.
pub const LONG_MESSAGE_CHARS: usize = 12_000;

/// `chars` characters of filler prose, the same for the same `seed`.
pub fn filler(seed: usize, chars: usize) -> String {
    let mut out = String::with_capacity(chars + 16);
    let mut word = seed;
    let mut in_paragraph = 0;
    while out.len() < chars {
        if in_paragraph == PARAGRAPH_WORDS {
            out.push_str("\n\n");
            in_paragraph = 0;
        } else if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(WORDS[word % WORDS.len()]);
        word = word.wrapping_mul(31).wrapping_add(7);
        in_paragraph += 1;
    }
    // ASCII only, so byte and char boundaries agree.
    out.truncate(chars);
    out
}

#[derive(Debug)]
struct PendingReply {
    id: ItemId,
    text: String,
    emitted: usize,
}

#[derive(Debug)]
pub struct TranscriptFeed {
    stream_rate: usize,
    next_index: usize,
    pending: Option<PendingReply>,
}

impl TranscriptFeed {
    pub fn new(stream_rate: usize) -> Self {
        Self { stream_rate: stream_rate.max(1), next_index: 0, pending: None }
    }

    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.pending.is_some()
    }

    fn next_message(&mut self, role: MessageRole, content: String) -> MessageItem {
        let index = self.next_index;
        self.next_index += 1;
        MessageItem::new(format!("msg-{index}"), role, content).at_index(index)
    }

    /// Alternating history of mixed lengths; every 17th message is long
    /// enough to be chunked.
    pub fn seed(&mut self, count: usize) -> Vec<MessageItem> {
        (0..count)
            .map(|i| {
                let role = if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
                let len = if i % 17 == 16 { 5_000 } else { 40 + (i * 137) % 600 };
                self.next_message(role, filler(i, len))
            })
            .collect()
    }

    /// Push a prompt and an empty streaming reply. Ignored while a reply is
    /// still streaming.
    pub fn start_exchange(&mut self, messages: &mut Vec<MessageItem>) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let seed = self.next_index;
        let prompt = self.next_message(MessageRole::User, filler(seed, 60 + seed % 120));
        messages.push(prompt);
        let reply = self.next_message(MessageRole::Assistant, String::new()).streaming();
        let target = 1_500 + (seed * 389) % 3_500;
        tracing::debug!(reply = %reply.id, target, "starting simulated reply");
        self.pending =
            Some(PendingReply { id: reply.id.clone(), text: filler(seed + 1, target), emitted: 0 });
        messages.push(reply);
        true
    }

    pub fn push_long_message(&mut self, messages: &mut Vec<MessageItem>) {
        let seed = self.next_index;
        let message = self.next_message(MessageRole::Assistant, filler(seed, LONG_MESSAGE_CHARS));
        messages.push(message);
    }

    /// Stream the next slice of the pending reply. Returns whether the
    /// transcript changed.
    pub fn advance(&mut self, messages: &mut [MessageItem]) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let Some(reply) = messages.iter_mut().rev().find(|m| m.id == pending.id) else {
            // Reply vanished from the transcript; nothing left to stream into.
            self.pending = None;
            return false;
        };
        let end = (pending.emitted + self.stream_rate).min(pending.text.len());
        reply.push_str(&pending.text[pending.emitted..end]);
        pending.emitted = end;
        if end == pending.text.len() {
            reply.is_streaming = false;
            tracing::debug!(reply = %reply.id, "simulated reply finished");
            self.pending = None;
        }
        true
    }
}
