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

use std::fmt;

/// Identifier of a rendered item: a whole message or one of its chunks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the `order`-th chunk of this message.
    #[must_use]
    pub fn chunk(&self, order: usize) -> Self {
        Self(format!("{}#chunk-{order}", self.0))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A chat message as owned by the surrounding session. The viewport only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageItem {
    pub id: ItemId,
    pub content: String,
    pub role: MessageRole,
    pub is_streaming: bool,
    pub created_index: usize,
}

impl MessageItem {
    pub fn new(id: impl Into<ItemId>, role: MessageRole, content: impl Into<String>) -> Self {
        Self { id: id.into(), content: content.into(), role, is_streaming: false, created_index: 0 }
    }

    #[must_use]
    pub fn streaming(mut self) -> Self {
        self.is_streaming = true;
        self
    }

    #[must_use]
    pub fn at_index(mut self, created_index: usize) -> Self {
        self.created_index = created_index;
        self
    }

    /// Content length in characters, the unit chunking and estimation work in.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Append streamed tokens.
    pub fn push_str(&mut self, tokens: &str) {
        self.content.push_str(tokens);
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
