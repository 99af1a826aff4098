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

use crate::model::{MessageItem, MessageRole};
use crate::ui::theme;
use crate::viewport::{ContentChunk, MessageRenderer, RenderedMessage, hidden_chunk_count};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

/// Renders messages as wrapped paragraphs; heights are in terminal rows.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    width: u16,
}

impl TerminalRenderer {
    pub fn new(width: u16) -> Self {
        Self { width }
    }
}

impl MessageRenderer for TerminalRenderer {
    type Block = Paragraph<'static>;

    #[allow(clippy::cast_precision_loss)]
    fn render(
        &mut self,
        message: &MessageItem,
        chunks: &[ContentChunk],
    ) -> RenderedMessage<Paragraph<'static>> {
        let paragraph = Paragraph::new(Text::from(message_lines(message, chunks)))
            .wrap(Wrap { trim: false });
        // line_count gives the real wrapped height
        let height = paragraph.line_count(self.width).max(1);
        RenderedMessage { block: paragraph, height: height as f32 }
    }
}

pub fn message_lines(message: &MessageItem, chunks: &[ContentChunk]) -> Vec<Line<'static>> {
    let (label, color) = theme::role_label(message.role);
    let mut lines =
        vec![Line::from(Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)))];

    let body: String =
        chunks.iter().filter(|c| c.is_visible).map(|c| c.content.as_str()).collect();
    let body_style = match message.role {
        MessageRole::User => Style::default().bg(theme::USER_MSG_BG),
        MessageRole::Assistant | MessageRole::System => Style::default(),
    };
    for text in body.split('\n') {
        lines.push(Line::from(Span::styled(text.to_owned(), body_style)));
    }

    if message.is_streaming
        && let Some(last) = lines.last_mut()
    {
        last.spans.push(Span::styled(theme::STREAM_CURSOR, Style::default().fg(theme::RUST_ORANGE)));
    }

    let hidden = hidden_chunk_count(chunks);
    if hidden > 0 {
        let noun = if hidden == 1 { "chunk" } else { "chunks" };
        lines.push(Line::from(Span::styled(
            format!("… {hidden} more {noun} hidden, press e to show all"),
            Style::default().fg(theme::DIM).add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}
