use std::io;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::game::Snapshot;
use crate::input::{ButtonLayout, Direction, Key, RawEvent};
use crate::renderer::{self, Viewport};
use crate::scheduler::{InputSource, RenderSink};

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns terminal lifecycle (raw mode, alternate screen, mouse capture) for one
/// game session.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen and creates a ratatui terminal.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide) {
            let _ = cleanup_terminal_best_effort();
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = cleanup_terminal_best_effort();
                Err(error)
            }
        }
    }

    /// Returns mutable access to the inner ratatui terminal.
    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = cleanup_terminal_best_effort();
    }
}

/// Restores the terminal; safe to call more than once, e.g. from a panic hook.
pub fn cleanup_terminal_best_effort() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, DisableMouseCapture, Show, LeaveAlternateScreen)
}

/// Crossterm input source and ratatui render sink over one terminal session.
pub struct TerminalFrontend {
    session: TerminalSession,
    buttons: ButtonLayout,
    cell_size: u32,
    viewport: Option<Viewport>,
}

impl TerminalFrontend {
    #[must_use]
    pub fn new(session: TerminalSession, buttons: ButtonLayout, cell_size: u32) -> Self {
        Self {
            session,
            buttons,
            cell_size,
            viewport: None,
        }
    }
}

impl InputSource for TerminalFrontend {
    fn drain_events(&mut self) -> io::Result<Vec<RawEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Some(raw) = map_event(event::read()?, self.viewport.as_ref()) {
                events.push(raw);
            }
        }
        Ok(events)
    }
}

impl RenderSink for TerminalFrontend {
    fn render(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let buttons = self.buttons;
        let cell_size = self.cell_size;
        let mut viewport = None;

        self.session.terminal_mut().draw(|frame| {
            viewport = renderer::render(frame, snapshot, &buttons, cell_size);
        })?;

        self.viewport = viewport;
        Ok(())
    }
}

/// Maps a crossterm event to a raw game event. Clicks outside the board, or
/// before the first frame was drawn, are dropped.
#[must_use]
pub fn map_event(event: Event, viewport: Option<&Viewport>) -> Option<RawEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => {
            let (x, y) = viewport?.to_pixels(column, row)?;
            Some(RawEvent::PointerDown { x, y })
        }
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<RawEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(RawEvent::Quit);
    }

    let mapped = match key.code {
        KeyCode::Char('q' | 'Q') => return Some(RawEvent::Quit),
        KeyCode::Up | KeyCode::Char('w' | 'W') => Key::Arrow(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Key::Arrow(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Key::Arrow(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Key::Arrow(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Key::Confirm,
        KeyCode::Tab | KeyCode::Char('o' | 'O') => Key::Settings,
        KeyCode::Char('+' | '=') => Key::VolumeUp,
        KeyCode::Char('-' | '_') => Key::VolumeDown,
        KeyCode::Esc | KeyCode::Backspace => Key::Back,
        _ => return None,
    };
    Some(RawEvent::KeyDown(mapped))
}
