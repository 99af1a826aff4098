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

//! Splitting oversized message bodies into ordered chunks so only a bounded
//! prefix renders by default.

use crate::config::ChunkPolicy;
use crate::error::ConfigError;
use crate::model::{ItemId, MessageItem};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChunk {
    pub id: ItemId,
    pub parent_id: ItemId,
    pub content: String,
    pub order: usize,
    pub is_visible: bool,
}

/// "Show all" toggle state for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Collapsed,
    Expanded,
}

impl Expansion {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }
}

#[derive(Debug)]
pub struct ContentChunker {
    policy: ChunkPolicy,
    expanded: HashSet<ItemId>,
}

impl ContentChunker {
    pub fn new(policy: ChunkPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self { policy, expanded: HashSet::new() })
    }

    #[must_use]
    pub fn policy(&self) -> &ChunkPolicy {
        &self.policy
    }

    /// Split `message` into chunks. Concatenating the result in order always
    /// reproduces the full content.
    pub fn chunk(&self, message: &MessageItem) -> Vec<ContentChunk> {
        let len = message.char_len();
        if len <= self.policy.expand_threshold {
            return vec![ContentChunk {
                id: message.id.chunk(0),
                parent_id: message.id.clone(),
                content: message.content.clone(),
                order: 0,
                is_visible: true,
            }];
        }

        // Live output is never truncated, whatever the toggle says.
        let show_all = message.is_streaming || self.is_expanded(&message.id);
        split_at_char_boundaries(&message.content, self.policy.chunk_size)
            .into_iter()
            .enumerate()
            .map(|(order, slice)| ContentChunk {
                id: message.id.chunk(order),
                parent_id: message.id.clone(),
                content: slice.to_owned(),
                order,
                is_visible: show_all || order < self.policy.initial_chunks,
            })
            .collect()
    }

    #[must_use]
    pub fn is_expanded(&self, id: &ItemId) -> bool {
        self.expanded.contains(id)
    }

    #[must_use]
    pub fn expansion(&self, id: &ItemId) -> Expansion {
        if self.is_expanded(id) { Expansion::Expanded } else { Expansion::Collapsed }
    }

    pub fn set_expansion(&mut self, id: &ItemId, expansion: Expansion) {
        match expansion {
            Expansion::Expanded => {
                self.expanded.insert(id.clone());
            }
            Expansion::Collapsed => {
                self.expanded.remove(id);
            }
        }
    }

    /// Flip "show all" for a message and return the new state.
    pub fn toggle(&mut self, id: &ItemId) -> Expansion {
        let next = self.expansion(id).toggled();
        self.set_expansion(id, next);
        next
    }

    /// Forget toggle state for a message that left the conversation.
    pub fn forget(&mut self, id: &ItemId) {
        self.expanded.remove(id);
    }

    pub fn retain_live(&mut self, live: &HashSet<ItemId>) {
        self.expanded.retain(|id| live.contains(id));
    }
}

/// Number of chunks hidden behind "show more".
pub fn hidden_chunk_count(chunks: &[ContentChunk]) -> usize {
    chunks.iter().filter(|c| !c.is_visible).count()
}

/// Slices of at most `chunk_size` characters. Never yields an empty slice.
fn split_at_char_boundaries(content: &str, chunk_size: usize) -> Vec<&str> {
    let mut slices = Vec::new();
    let mut start = 0usize;
    let mut count = 0usize;
    for (byte_idx, _) in content.char_indices() {
        if count == chunk_size {
            slices.push(&content[start..byte_idx]);
            start = byte_idx;
            count = 0;
        }
        count += 1;
    }
    if start < content.len() {
        slices.push(&content[start..]);
    }
    slices
}
