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

use super::chunk::ContentChunk;
use crate::model::MessageItem;

/// A drawn message plus the height it occupies once laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage<B> {
    pub block: B,
    pub height: f32,
}

/// Turns one message into something the host can draw.
///
/// `chunks` is the chunker's split of the message; only chunks with
/// `is_visible` set should be drawn. The returned height is fed back to the
/// viewport as a measurement, so it must be in the same unit as the config.
pub trait MessageRenderer {
    type Block;

    fn render(&mut self, message: &MessageItem, chunks: &[ContentChunk]) -> RenderedMessage<Self::Block>;
}
