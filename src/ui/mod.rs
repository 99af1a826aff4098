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

mod chat;
mod message;
pub mod theme;

pub use message::{TerminalRenderer, message_lines};

use crate::app::App;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(frame: &mut Frame, app: &mut App) {
    let frame_area = frame.area();
    if frame_area.height < 3 {
        // Ultra-compact: chat only
        chat::render(frame, frame_area, app);
        return;
    }
    let [body, separator, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
            .areas(frame_area);

    chat::render(frame, body, app);
    render_separator(frame, separator);
    render_footer(frame, footer, app);
}

const FOOTER_PAD: u16 = 2;
const FOOTER_COLUMN_GAP: u16 = 1;
const FOOTER_KEYS: &str = "Enter reply · b long message · e expand · End bottom · q quit";

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x + FOOTER_PAD,
        y: area.y,
        width: area.width.saturating_sub(FOOTER_PAD * 2),
        height: area.height,
    };
    let (left_area, right_area) = split_footer_columns(padded);
    frame.render_widget(Paragraph::new(footer_status_line(app)), left_area);

    let (right_text, right_color) = if app.viewport.show_scroll_button() {
        (theme::NEW_MESSAGES_HINT, theme::RUST_ORANGE)
    } else {
        (FOOTER_KEYS, theme::DIM)
    };
    render_footer_right_info(frame, right_area, right_text, right_color);
}

fn footer_status_line(app: &App) -> Line<'static> {
    let (follow, follow_color) = if app.viewport.allows_auto_scroll() {
        ("following", theme::STATUS_FOLLOWING)
    } else {
        ("paused", theme::STATUS_PAUSED)
    };
    let (scroll, scroll_color) = theme::auto_scroll_label(app.viewport.auto_scroll_state());
    Line::from(vec![
        Span::styled("[", Style::default().fg(follow_color)),
        Span::styled(follow, Style::default().fg(follow_color).add_modifier(Modifier::BOLD)),
        Span::styled("]", Style::default().fg(follow_color)),
        Span::raw("  "),
        Span::styled(scroll, Style::default().fg(scroll_color)),
        Span::styled(format!("  {}", position_text(app)), Style::default().fg(theme::DIM)),
    ])
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn position_text(app: &App) -> String {
    let window = app.viewport.window();
    let row = app.viewport.scroll_top().round().max(0.0) as u64;
    let total = app.viewport.total_height().round().max(0.0) as u64;
    format!(
        "row {row}/{total} · {} msgs · drawing {}",
        app.messages.len(),
        window.visible.len()
    )
}

fn split_footer_columns(area: Rect) -> (Rect, Rect) {
    if area.width == 0 {
        return (area, Rect { width: 0, ..area });
    }

    let gap = if area.width > 2 { FOOTER_COLUMN_GAP } else { 0 };
    let usable_width = area.width.saturating_sub(gap);
    let left_width = usable_width.saturating_add(1) / 2;
    let right_width = usable_width.saturating_sub(left_width);

    let left = Rect { width: left_width, ..area };
    let right = Rect {
        x: area.x.saturating_add(left_width).saturating_add(gap),
        width: right_width,
        ..area
    };
    (left, right)
}

fn fit_footer_right_text(text: &str, max_width: usize) -> Option<String> {
    if max_width == 0 || text.trim().is_empty() {
        return None;
    }

    if UnicodeWidthStr::width(text) <= max_width {
        return Some(text.to_owned());
    }

    if max_width <= 3 {
        return Some(".".repeat(max_width));
    }

    let mut fitted = String::new();
    let mut width: usize = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width.saturating_add(ch_width).saturating_add(3) > max_width {
            break;
        }
        fitted.push(ch);
        width = width.saturating_add(ch_width);
    }
    fitted.push_str("...");
    Some(fitted)
}

fn render_footer_right_info(frame: &mut Frame, area: Rect, right_text: &str, right_color: Color) {
    let Some(fitted) = fit_footer_right_text(right_text, usize::from(area.width)) else {
        return;
    };
    let line = Line::from(Span::styled(fitted, Style::default().fg(right_color)));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let sep_str = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    let line = Line::from(Span::styled(sep_str, Style::default().fg(theme::DIM)));
    frame.render_widget(Paragraph::new(line), area);
}
