use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::time::Duration;

use crate::tui::app::{App, Mode, Tab};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;

/// Guard that restores the terminal even on panic. Leaving raw mode or the
/// alternate screen active would make the user's shell unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore terminal state on normal exit; drop does nothing afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already on a cleanup path; errors are ignored
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check size before entering the alternate screen so the error is readable
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::debug!("tui started");

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                terminal_rect,
                app.config.sidebar_width_percent,
                app.ui.current_tab != Tab::Dashboard,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                // Only Press events; Windows also reports Release
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    tracing::debug!("tui stopped");
    Ok(())
}

/// Handle one key press. Returns true when the app should quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if app.ui.mode == Mode::Help {
        if key_event.code == KeyCode::Esc || app.bindings.help.matches(&key_event) {
            app.toggle_help();
        }
        return Ok(false);
    }

    let bindings = app.bindings.clone();

    if bindings.quit.matches(&key_event) {
        return Ok(true);
    }
    if bindings.help.matches(&key_event) {
        app.toggle_help();
        return Ok(false);
    }

    // Selection changes read from the database; a failure is shown, not fatal
    let result = if bindings.tab_right.matches(&key_event) || key_event.code == KeyCode::Tab {
        app.next_tab()
    } else if bindings.tab_left.matches(&key_event) || key_event.code == KeyCode::BackTab {
        app.previous_tab()
    } else if bindings.list_up.matches(&key_event) || key_event.code == KeyCode::Up {
        app.move_selection_up()
    } else if bindings.list_down.matches(&key_event) || key_event.code == KeyCode::Down {
        app.move_selection_down()
    } else if bindings.filter.matches(&key_event) && app.ui.current_tab == Tab::Tasks {
        app.cycle_task_filter()
    } else if bindings.mark_done.matches(&key_event) && app.ui.current_tab == Tab::Tasks {
        app.mark_selected_task_done();
        Ok(())
    } else if bindings.copy_url.matches(&key_event) && app.ui.current_tab == Tab::Links {
        app.copy_selected_link_url();
        Ok(())
    } else if bindings.reload.matches(&key_event) {
        app.reload();
        Ok(())
    } else {
        match key_event.code {
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                app.switch_tab(Tab::ALL[index])
            }
            KeyCode::PageDown => {
                app.scroll_item_view(5);
                Ok(())
            }
            KeyCode::PageUp => {
                app.scroll_item_view(-5);
                Ok(())
            }
            _ => Ok(()),
        }
    };

    if let Err(e) = result {
        app.report_failure("load data", &e);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Database};
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn number_keys_jump_to_tabs_and_q_quits() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("app.db")).unwrap();
        let mut app = App::new(Config::default(), db).unwrap();

        assert!(!handle_key_event(&mut app, press(KeyCode::Char('4'))).unwrap());
        assert_eq!(app.ui.current_tab, Tab::Tasks);

        handle_key_event(&mut app, press(KeyCode::Right)).unwrap();
        assert_eq!(app.ui.current_tab, Tab::Links);

        handle_key_event(&mut app, press(KeyCode::F(1))).unwrap();
        assert_eq!(app.ui.mode, Mode::Help);
        // Keys other than Esc/help are swallowed while help is open
        assert!(!handle_key_event(&mut app, press(KeyCode::Char('q'))).unwrap());
        handle_key_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui.mode, Mode::View);

        assert!(handle_key_event(&mut app, press(KeyCode::Char('q'))).unwrap());
    }
}
