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

use crate::model::MessageRole;
use crate::viewport::AutoScrollState;
use ratatui::style::Color;

// Accent
pub const RUST_ORANGE: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const SEPARATOR_CHAR: &str = "─";
pub const STREAM_CURSOR: &str = "▍";
pub const NEW_MESSAGES_HINT: &str = "↓ new messages (End)";

// Role header colors
pub const ROLE_USER: Color = Color::White;
pub const ROLE_ASSISTANT: Color = RUST_ORANGE;
pub const ROLE_SYSTEM: Color = Color::Yellow;

// User message background
pub const USER_MSG_BG: Color = Color::Rgb(40, 44, 52);

// Auto-scroll status colors
pub const STATUS_FOLLOWING: Color = Color::Green;
pub const STATUS_PAUSED: Color = Color::Yellow;
pub const STATUS_ANIMATING: Color = Color::Cyan;

pub fn role_label(role: MessageRole) -> (&'static str, Color) {
    match role {
        MessageRole::User => ("You", ROLE_USER),
        MessageRole::Assistant => ("Assistant", ROLE_ASSISTANT),
        MessageRole::System => ("System", ROLE_SYSTEM),
    }
}

pub fn auto_scroll_label(state: AutoScrollState) -> (&'static str, Color) {
    match state {
        AutoScrollState::Idle => ("idle", DIM),
        AutoScrollState::AnimatingDiscrete => ("scrolling", STATUS_ANIMATING),
        AutoScrollState::AnimatingStreaming => ("streaming", STATUS_ANIMATING),
        AutoScrollState::Cancelled => ("cancelled", STATUS_PAUSED),
    }
}
