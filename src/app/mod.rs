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

mod events;
mod feed;
mod state;

pub use events::handle_terminal_event;
pub use feed::{LONG_MESSAGE_CHARS, TranscriptFeed, filler};
pub use state::App;

use crate::Cli;
use crate::config::ViewportConfig;
use crate::error::AppError;
use crossterm::event::EventStream;
use futures::{FutureExt as _, StreamExt};
use std::time::{Duration, Instant};

pub fn create_app(cli: &Cli, config: ViewportConfig) -> anyhow::Result<App> {
    App::new(config, cli.seed, cli.stream_rate, Instant::now())
        .map_err(|e| anyhow::Error::new(AppError::InvalidConfig).context(e))
}

// ---------------------------------------------------------------------------
// TUI event loop
// ---------------------------------------------------------------------------

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::try_init()
        .map_err(|e| anyhow::Error::new(AppError::TerminalUnavailable).context(e))?;

    // Wheel scrolling needs mouse capture (ignore error on unsupported terminals)
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture);

    let mut events = EventStream::new();
    let tick_duration = Duration::from_millis(16);
    let mut last_render = Instant::now();

    loop {
        // Phase 1: wait for at least one event or the next frame tick
        let time_to_next = tick_duration.saturating_sub(last_render.elapsed());
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                events::handle_terminal_event(app, event, Instant::now());
            }
            () = tokio::time::sleep(time_to_next) => {}
        }

        // Phase 2: drain all remaining queued events (non-blocking)
        while let Some(Some(Ok(event))) = events.next().now_or_never() {
            events::handle_terminal_event(app, event, Instant::now());
        }

        if app.should_quit {
            break;
        }

        // Phase 3: advance timers and render once
        app.advance_frame(Instant::now());
        terminal.draw(|f| crate::ui::render(f, app))?;
        last_render = Instant::now();
    }

    app.viewport.teardown();

    // Restore terminal
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
    ratatui::restore();

    Ok(())
}
