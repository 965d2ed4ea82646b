//! Interactive line-by-line driver over an [`Engine`].
//!
//! Each iteration shows the tape window, reads one line and either runs a
//! special command (`reset`, `undo`, `quit`) or interprets the line. Tape
//! state carries over between lines; `undo` rolls back the last executed
//! line only.

use std::io::{self, Write};
use std::str::FromStr;

use log::debug;

use crate::cli_util::write_engine_error;
use crate::display::{TapeView, DEFAULT_RADIUS};
use crate::engine::{Engine, EngineError, Snapshot};
use crate::input::{InputEvent, LineSource};
use crate::theme::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Stopped,
}

/// Lines the session handles itself instead of interpreting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    Quit,
    Undo,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => Ok(Command::Reset),
            "quit" => Ok(Command::Quit),
            "undo" => Ok(Command::Undo),
            _ => Err(()),
        }
    }
}

/// The REPL state machine.
///
/// `L` supplies lines and `W` receives everything the session shows: tape
/// window, program output, notices and inline errors.
pub struct Session<L, W> {
    engine: Engine,
    lines: L,
    out: W,
    state: SessionState,
    exec_line: usize,
    snapshot: Snapshot,
    radius: usize,
    styled: bool,
}

impl<L: LineSource, W: Write> Session<L, W> {
    /// Wrap `engine`. Echo is switched off: output is reported by the session.
    pub fn new(mut engine: Engine, lines: L, out: W) -> Self {
        engine.disable_echo();
        let snapshot = engine.snapshot();
        Self {
            engine,
            lines,
            out,
            state: SessionState::Stopped,
            exec_line: 0,
            snapshot,
            radius: DEFAULT_RADIUS,
            styled: false,
        }
    }

    /// Cells shown on each side of the pointer.
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    /// Use ANSI colors in the tape window and message prefixes.
    pub fn with_style(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn exec_line(&self) -> usize {
        self.exec_line
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Run until `quit`, an interrupt, or the end of input.
    pub fn start(&mut self) -> io::Result<()> {
        self.state = SessionState::Running;
        self.engine.disable_echo();
        self.print_welcome()?;
        while self.state == SessionState::Running {
            self.step()?;
        }
        self.out.flush()
    }

    /// One iteration: show the tape, read a line, act on it.
    pub fn step(&mut self) -> io::Result<()> {
        self.print_tape()?;

        match self.lines.read_line(self.exec_line)? {
            InputEvent::Text(line) => match line.trim().parse::<Command>() {
                Ok(command) => self.run_command(command)?,
                Err(()) => self.execute(&line)?,
            },
            InputEvent::Interrupted | InputEvent::Closed => self.stop()?,
        }

        self.exec_line += 1;
        self.out.flush()
    }

    fn run_command(&mut self, command: Command) -> io::Result<()> {
        debug!("session command {command:?} at line {}", self.exec_line);
        match command {
            Command::Reset => {
                self.info("Resetting interpreter...")?;
                self.engine.reset();
            }
            Command::Quit => self.stop()?,
            Command::Undo => {
                self.info("Undoing previous command")?;
                self.engine.restore(self.snapshot.clone());
            }
        }
        Ok(())
    }

    fn execute(&mut self, line: &str) -> io::Result<()> {
        self.snapshot = self.engine.snapshot();
        debug!("snapshot taken before line {}", self.exec_line);

        let result = self.engine.interpret(line);

        for warning in self.engine.take_warnings() {
            let prefix = self.paint(messages::warning(), "WARNING ::");
            writeln!(self.out, "{prefix} {warning}")?;
        }

        match result {
            Ok(output) => {
                if !output.is_empty() {
                    let tag = self.paint(messages::output(), &format!("[Out {}]:", self.exec_line));
                    writeln!(self.out, "{tag} {output}")?;
                }
            }
            Err(EngineError::Interrupted { .. }) => self.stop()?,
            Err(err) => {
                let prefix = self.paint(messages::error(), "ERROR ::");
                write!(self.out, "{prefix} ")?;
                write_engine_error(&mut self.out, None, line, &err)?;
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.info("Quitting...")?;
        self.state = SessionState::Stopped;
        Ok(())
    }

    fn info(&mut self, message: &str) -> io::Result<()> {
        let prefix = self.paint(messages::info(), "INFO ::");
        writeln!(self.out, "{prefix} {message}")
    }

    fn print_tape(&mut self) -> io::Result<()> {
        let rendered = TapeView::new(self.engine.cells(), self.engine.pointer())
            .with_radius(self.radius)
            .render();
        if self.styled {
            writeln!(self.out, "{}", rendered.styled())
        } else {
            writeln!(self.out, "{rendered}")
        }
    }

    fn print_welcome(&mut self) -> io::Result<()> {
        let lines = [
            String::new(),
            "  ** Welcome!".to_string(),
            format!("  ** Brainf Interactive Interpreter version {}", env!("CARGO_PKG_VERSION")),
            "  ** Commands: reset, undo, quit".to_string(),
        ];
        for line in lines {
            let line = self.paint(messages::banner(), &line);
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn paint(&self, style: nu_ansi_term::Style, text: &str) -> String {
        if self.styled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}
