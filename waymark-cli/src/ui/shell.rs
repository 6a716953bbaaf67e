//! Terminal shell: raw mode, input events, and frame drawing.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::CliError;
use crate::ui::{render_map_ui, render_start_ui, MapView};

/// Spinner animation frames.
const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Input events the shell reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// Leave the application.
    Quit,
    /// Press the start button.
    Activate,
    /// Search for nearby places.
    FindNearby,
}

/// Owns the terminal for the lifetime of the interactive shell.
///
/// Raw mode and the alternate screen are entered on construction and
/// restored on drop, so a panic or early return still leaves the user
/// with a working terminal.
pub struct Shell {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    spinner_index: usize,
}

impl Shell {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self, CliError> {
        enable_raw_mode().map_err(CliError::Terminal)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide).map_err(CliError::Terminal)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(CliError::Terminal)?;
        Ok(Self {
            terminal,
            spinner_index: 0,
        })
    }

    /// Poll for the next input event without blocking.
    pub fn poll_event(&mut self) -> Result<Option<ShellEvent>, CliError> {
        if !event::poll(Duration::ZERO).map_err(CliError::Terminal)? {
            return Ok(None);
        }
        match event::read().map_err(CliError::Terminal)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Self::map_key(key)),
            _ => Ok(None),
        }
    }

    fn map_key(key: KeyEvent) -> Option<ShellEvent> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(ShellEvent::Quit)
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(ShellEvent::Quit),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => Some(ShellEvent::Activate),
            KeyCode::Char('f') | KeyCode::Char('n') => Some(ShellEvent::FindNearby),
            _ => None,
        }
    }

    /// Draw the start screen.
    pub fn draw_start(&mut self, backend_name: &str, waiting: bool) -> Result<(), CliError> {
        let spinner = self.next_spinner();
        self.terminal
            .draw(|frame| render_start_ui(frame, backend_name, waiting, spinner))
            .map_err(CliError::Terminal)?;
        Ok(())
    }

    /// Draw the map screen.
    pub fn draw_map(&mut self, view: &MapView) -> Result<(), CliError> {
        let spinner = self.next_spinner();
        self.terminal
            .draw(|frame| render_map_ui(frame, view, spinner))
            .map_err(CliError::Terminal)?;
        Ok(())
    }

    fn next_spinner(&mut self) -> char {
        let frame = SPINNER_FRAMES[self.spinner_index % SPINNER_FRAMES.len()];
        self.spinner_index = self.spinner_index.wrapping_add(1);
        frame
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
    }
}
