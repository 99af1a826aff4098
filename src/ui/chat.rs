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

use crate::app::App;
use crate::ui::message::TerminalRenderer;
use crate::ui::theme;
use crate::viewport::VisibleBlock;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Draw only the windowed slice of the transcript, clipped to `area`.
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    app.fit_viewport(area.width, area.height);

    let mut renderer = TerminalRenderer::new(area.width);
    let blocks = app.viewport.render_visible(&app.messages, &mut renderer, app.now);
    // Read after rendering: measurements may have anchored the offset.
    let offset = app.viewport.scroll_top().round();
    let rows = f32::from(area.height);

    for VisibleBlock { position, block } in blocks {
        let top = position.top.round() - offset;
        let bottom = top + position.height.round();
        if bottom <= 0.0 || top >= rows {
            continue;
        }
        let skip = (-top).max(0.0);
        let y = top.max(0.0);
        let height = (bottom.min(rows) - y).max(0.0);
        let target = Rect {
            x: area.x,
            y: area.y.saturating_add(to_rows(y)),
            width: area.width,
            height: to_rows(height),
        };
        frame.render_widget(block.scroll((to_rows(skip), 0)), target);
    }

    if app.viewport.show_scroll_button() {
        render_new_messages_hint(frame, area);
    }
}

/// Whole terminal rows for a layout length, saturating at both ends.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_rows(length: f32) -> u16 {
    // In range after the clamp; NaN lands on zero.
    length.round().clamp(0.0, f32::from(u16::MAX)) as u16
}

fn render_new_messages_hint(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        format!(" {} ", theme::NEW_MESSAGES_HINT),
        Style::default().fg(theme::RUST_ORANGE).add_modifier(Modifier::BOLD | Modifier::REVERSED),
    ));
    let width = u16::try_from(line.width()).unwrap_or(area.width).min(area.width);
    let hint = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(1),
        width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(line), hint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::{Duration, Instant};

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_owned()
            })
            .collect()
    }

    fn draw_frames(
        terminal: &mut Terminal<TestBackend>,
        app: &mut App,
        from: Instant,
        frames: u32,
    ) -> Instant {
        let mut now = from;
        for _ in 0..frames {
            now += Duration::from_millis(16);
            app.advance_frame(now);
            terminal.draw(|f| render(f, f.area(), app)).unwrap();
        }
        now
    }

    #[test]
    fn settles_on_the_newest_message() {
        let t0 = Instant::now();
        let mut app = App::new(ViewportConfig::terminal(), 60, 20, t0).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        draw_frames(&mut terminal, &mut app, t0, 60);

        assert_eq!(app.viewport.scroll_top(), app.viewport.max_scroll_top());
        let rows = screen(&terminal);
        let last_word = app.messages.last().unwrap().content.split_whitespace().last().unwrap();
        let last_row = rows.iter().rev().find(|r| !r.is_empty()).unwrap();
        assert!(last_row.ends_with(last_word), "{last_word:?} not at the bottom: {rows:#?}");
        assert!(!rows.iter().any(|r| r.contains(theme::NEW_MESSAGES_HINT)));
    }

    #[test]
    fn scrolled_away_shows_new_messages_hint() {
        let t0 = Instant::now();
        let mut app = App::new(ViewportConfig::terminal(), 60, 20, t0).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let now = draw_frames(&mut terminal, &mut app, t0, 60);

        app.viewport.scroll_by(now, -40.0);
        draw_frames(&mut terminal, &mut app, now, 4);
        let rows = screen(&terminal);
        assert!(rows.last().is_some_and(|r| r.contains(theme::NEW_MESSAGES_HINT)), "{rows:#?}");
    }

    #[test]
    fn row_conversion_saturates() {
        assert_eq!(to_rows(12.0), 12);
        assert_eq!(to_rows(-4.0), 0);
        assert_eq!(to_rows(f32::NAN), 0);
        assert_eq!(to_rows(1.0e9), u16::MAX);
        assert_eq!(to_rows(f32::from(u16::MAX) + 1.0), u16::MAX);
    }

    #[test]
    fn only_the_window_is_measured() {
        let t0 = Instant::now();
        let mut app = App::new(ViewportConfig::terminal(), 200, 20, t0).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        draw_frames(&mut terminal, &mut app, t0, 1);
        let measured = app.viewport.measurements().len();
        assert!(measured > 0);
        assert!(measured < 30, "measured {measured} of 200 messages");
    }
}
