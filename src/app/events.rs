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

use super::App;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use std::time::Instant;

const MOUSE_SCROLL_ROWS: f32 = 3.0;

pub fn handle_terminal_event(app: &mut App, event: Event, now: Instant) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key, now),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse, now),
        // Resize is picked up when the next frame measures the chat area.
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent, now: Instant) {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.viewport.scroll_by(now, -MOUSE_SCROLL_ROWS);
        }
        MouseEventKind::ScrollDown => {
            app.viewport.scroll_by(now, MOUSE_SCROLL_ROWS);
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    let page = (app.viewport.viewport_height() - 1.0).max(1.0);
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (KeyCode::Char('q') | KeyCode::Esc, _) => app.should_quit = true,
        (KeyCode::Enter, _) => app.start_exchange(),
        (KeyCode::Char('b'), _) => app.push_long_message(),
        (KeyCode::Char('e'), _) => app.toggle_newest_expansion(),
        (KeyCode::Up | KeyCode::Char('k'), _) => {
            app.viewport.scroll_by(now, -1.0);
        }
        (KeyCode::Down | KeyCode::Char('j'), _) => {
            app.viewport.scroll_by(now, 1.0);
        }
        (KeyCode::PageUp, _) => {
            app.viewport.scroll_by(now, -page);
        }
        (KeyCode::PageDown, _) => {
            app.viewport.scroll_by(now, page);
        }
        (KeyCode::Home, _) => {
            app.viewport.on_user_scroll(now, 0.0);
        }
        (KeyCode::End, _) => app.viewport.force_scroll_to_bottom(now),
        _ => {}
    }
}
