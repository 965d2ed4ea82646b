//! Input collaborators.
//!
//! The engine asks a [`KeySource`] for one key whenever it executes `,`; the
//! interactive session asks a [`LineSource`] for one line per iteration. Both
//! return an [`InputEvent`], which keeps an interrupt (Ctrl+C) apart from any
//! real input value.
//!
//! Closures work as sources too, which is how tests script input:
//!
//! ```
//! use brainf::{Engine, InputEvent};
//!
//! let mut engine = Engine::new(4).unwrap();
//! engine.set_input_provider(|| Ok(InputEvent::Text("A".to_string())));
//! engine.interpret(",").unwrap();
//! assert_eq!(engine.read_current_cell(), 65);
//! ```

use std::io::{self, BufRead, IsTerminal, Read};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// One event produced by an input collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press (usually one character) or a full line without its newline.
    Text(String),
    /// The user asked to stop (Ctrl+C).
    Interrupted,
    /// The input stream ended (EOF or Ctrl+D).
    Closed,
}

/// Supplies single keys to the `,` instruction.
pub trait KeySource {
    fn read_key(&mut self) -> io::Result<InputEvent>;
}

/// Supplies REPL lines, tagged with the session's execution-line counter.
pub trait LineSource {
    fn read_line(&mut self, exec_line: usize) -> io::Result<InputEvent>;
}

impl<F> KeySource for F
where
    F: FnMut() -> io::Result<InputEvent>,
{
    fn read_key(&mut self) -> io::Result<InputEvent> {
        self()
    }
}

impl<F> LineSource for F
where
    F: FnMut(usize) -> io::Result<InputEvent>,
{
    fn read_line(&mut self, exec_line: usize) -> io::Result<InputEvent> {
        self(exec_line)
    }
}

/// Pick the key source for the current process: raw terminal capture when
/// stdin is a TTY, plain byte reads otherwise.
pub fn stdin_key_source() -> Box<dyn KeySource> {
    if io::stdin().is_terminal() {
        Box::new(TerminalKeys)
    } else {
        Box::new(StdinKeys)
    }
}

/// Reads one UTF-8 character from the process standard input.
///
/// The lock is taken per call so that a [`StdinLines`] reader on the same
/// stream keeps working between keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinKeys;

impl KeySource for StdinKeys {
    fn read_key(&mut self) -> io::Result<InputEvent> {
        read_char(&mut io::stdin().lock())
    }
}

/// Decode a single UTF-8 character from `reader`.
///
/// Returns [`InputEvent::Closed`] at EOF. Invalid sequences are replaced with
/// U+FFFD rather than rejected.
pub fn read_char<R: Read>(reader: &mut R) -> io::Result<InputEvent> {
    let mut buf = [0u8; 4];
    match reader.read(&mut buf[..1]) {
        Ok(0) => return Ok(InputEvent::Closed),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(InputEvent::Interrupted),
        Err(e) => return Err(e),
    }

    let width = utf8_width(buf[0]);
    if width > 1 {
        match reader.read_exact(&mut buf[1..width]) {
            Ok(()) => {}
            // Input ended partway through a character.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(InputEvent::Closed),
            Err(e) => return Err(e),
        }
    }
    Ok(InputEvent::Text(String::from_utf8_lossy(&buf[..width]).into_owned()))
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Captures a single key press from the terminal in raw mode.
///
/// Ctrl+C maps to [`InputEvent::Interrupted`], Ctrl+D to [`InputEvent::Closed`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalKeys;

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> io::Result<InputEvent> {
        let _raw = RawModeGuard::enable()?;
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if let Some(input) = key_to_input(key) {
                return Ok(input);
            }
        }
    }
}

fn key_to_input(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(InputEvent::Interrupted),
        KeyCode::Char('d') if ctrl => Some(InputEvent::Closed),
        KeyCode::Char(ch) => Some(InputEvent::Text(ch.to_string())),
        KeyCode::Enter => Some(InputEvent::Text("\n".to_string())),
        KeyCode::Tab => Some(InputEvent::Text("\t".to_string())),
        _ => None,
    }
}

/// Reads REPL lines from the process standard input without any editing
/// support. Used when stdin is piped.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinLines;

impl LineSource for StdinLines {
    fn read_line(&mut self, _exec_line: usize) -> io::Result<InputEvent> {
        read_line_from(&mut io::stdin().lock())
    }
}

/// Read one line from `reader`, stripping the trailing newline.
pub fn read_line_from<R: BufRead>(reader: &mut R) -> io::Result<InputEvent> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => Ok(InputEvent::Closed),
        Ok(_) => {
            let trimmed = line.trim_end_matches(['\n', '\r']);
            Ok(InputEvent::Text(trimmed.to_string()))
        }
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(InputEvent::Interrupted),
        Err(e) => Err(e),
    }
}
