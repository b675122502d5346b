//! Runtime: terminal lifecycle and the blocking key loop.
//!
//! Each key is handled to completion and the screen redrawn before the next
//! key is read, so picker handlers never interleave.

use std::io::Stdout;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use sprout_engine::{AssembledDocument, RecipeSession};
use tracing::{debug, info};

use crate::{
    app::{App, Effect},
    ui::{
        theme::{NordTheme, Theme},
        view,
    },
};

/// Put the terminal into raw mode and enter the alternate screen. Raw mode is
/// switched off again when the rest of the setup fails.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let entered = (|| -> Result<_> {
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Ok(Terminal::new(CrosstermBackend::new(stdout))?)
    })();
    undo_on_error(entered, || {
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })
}

fn undo_on_error<T>(result: Result<T>, undo: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App, theme: &dyn Theme) -> Result<Option<AssembledDocument>> {
    loop {
        terminal.draw(|frame| view::draw(frame, app, theme))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Effect::None => {}
            Effect::Quit => {
                debug!("picker closed without submitting");
                return Ok(None);
            }
            Effect::Submit(assembled) => return Ok(Some(assembled)),
        }
    }
}

/// Entry point for the TUI runtime: sets up the terminal, runs the key loop
/// and restores the terminal even when the loop fails.
pub fn run_app(session: RecipeSession) -> Result<Option<AssembledDocument>> {
    let theme = NordTheme::new();
    let mut app = App::new(session);
    let mut terminal = setup_terminal()?;
    info!("picker started");

    let outcome = event_loop(&mut terminal, &mut app, &theme);
    cleanup_terminal(&mut terminal)?;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn failed_setup_runs_the_undo_step() {
        let mut undone = false;
        let result: Result<()> = undo_on_error(Err(anyhow!("no tty")), || undone = true);
        assert!(result.is_err());
        assert!(undone);
    }

    #[test]
    fn successful_setup_keeps_the_terminal_state() {
        let mut undone = false;
        let result = undo_on_error(Ok(7), || undone = true);
        assert_eq!(result.unwrap(), 7);
        assert!(!undone);
    }
}
