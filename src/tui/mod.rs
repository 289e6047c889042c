//! Terminal front end: a ratatui observer of the run state plus the
//! keyboard listener feeding navigation and quit requests back.

pub mod draw;
pub mod input;

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, warn};

use crate::engine::{Observer, RunState, ViewEvent};
use crate::errors::Result;

pub use draw::ViewState;
pub use input::spawn_input_listener;

/// Observer drawing the run state into the alternate screen.
///
/// The terminal is put back into cooked mode when the observer is dropped.
pub struct TerminalObserver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    view: ViewState,
}

impl TerminalObserver {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            view: ViewState::default(),
        })
    }

    fn restore(&mut self) -> io::Result<()> {
        self.terminal.show_cursor()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()
    }
}

impl Observer for TerminalObserver {
    fn render(&mut self, state: &RunState) -> Result<()> {
        let view = &self.view;
        self.terminal.draw(|frame| draw::draw(frame, state, view))?;
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        debug!(error = message, "showing error");
        self.view.show_error = true;
    }

    fn view_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::ToggleHelp => self.view.show_help = !self.view.show_help,
            ViewEvent::DismissError => self.view.show_error = false,
            ViewEvent::Resized => {
                if let Err(e) = self.terminal.autoresize() {
                    warn!(error = %e, "failed to resize terminal");
                }
            }
        }
    }
}

impl Drop for TerminalObserver {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            eprintln!("tasktui: failed to restore terminal: {e}");
        }
    }
}
