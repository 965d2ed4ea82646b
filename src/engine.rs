//! The tape engine.
//!
//! The engine operates on a fixed tape (30,000 cells by default) with a single
//! data pointer and executes programs written with the eight instructions
//! `><+-.,[]`.
//!
//! Behaviors:
//! - Cells are signed 64-bit integers, initialized to 0. `+` and `-` are not
//!   masked to a byte; they only wrap at the `i64` limits.
//! - The data pointer wraps around: `<` on cell 0 moves to the last cell and
//!   `>` on the last cell moves to cell 0.
//! - Every other character is ignored, so programs may carry comments.
//! - Brackets are validated before a program runs; unmatched brackets are
//!   reported as errors and leave the tape untouched.
//! - Tape state survives between [`Engine::interpret`] calls, so a program may
//!   be fed in pieces (this is what the interactive session does).
//!
//! Quick start:
//!
//! ```
//! use brainf::Engine;
//!
//! let mut engine = Engine::new(10).unwrap();
//! engine.disable_echo();
//! let out = engine.interpret("++++++++[>++++++++<-]>+.").unwrap();
//! assert_eq!(out, "A");
//! ```

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::input::{InputEvent, KeySource, StdinKeys};

/// Default tape length.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// First line written to a freshly created output file.
pub const OUTPUT_FILE_HEADER: &str = "==== Created by Brainfuck interpreter ===\n";

/// Errors that stop an [`Engine::interpret`] call.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The tape must have at least one cell.
    #[error("invalid tape size {size}: the tape needs at least one cell")]
    InvalidSize { size: usize },

    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: BracketKind },

    /// Bracket matching was asked to start somewhere other than a `[`.
    #[error("bracket matching must start at '['")]
    NotAtLoopStart,

    /// `.` found a cell value that is not a Unicode scalar value.
    #[error("cell value {value} is not a printable character at instruction {ip}")]
    InvalidCodePoint { ip: usize, value: i64 },

    /// The key source reported an interrupt while `,` was waiting.
    #[error("input interrupted at instruction {ip}")]
    Interrupted { ip: usize },

    /// The key source failed while `,` was waiting.
    #[error("input error at instruction {ip}: {source}")]
    Input {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// A file could not be read or created.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Problems the engine recovers from on its own. Collect them with
/// [`Engine::take_warnings`] after a call.
#[derive(Debug, thiserror::Error)]
pub enum Warning {
    /// `,` received more than one character; only the first one was stored.
    #[error(
        "',' accepts a single character, not strings; using only '{used}' ({discarded} more ignored) at instruction {ip}"
    )]
    MultiCharInput { ip: usize, used: char, discarded: usize },

    /// Appending to the output file failed; the character still reached the
    /// output buffer.
    #[error("could not write to output file {}: {source}", .path.display())]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Copy of the tape and data pointer, used by the session's `undo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub cells: Vec<i64>,
    pub pointer: usize,
}

/// The interpreter state.
///
/// Owns:
/// - the tape of signed cells and the data pointer into it,
/// - the code pointer and loop stack of the program being interpreted,
/// - the output buffer of the current call, the optional output file and the
///   console echo flag,
/// - the key source used by `,`.
pub struct Engine {
    tape: Vec<i64>,
    pointer: usize,
    code_ptr: usize,
    loop_stack: Vec<usize>,
    output: String,
    output_file: Option<PathBuf>,
    echo: bool,
    input: Box<dyn KeySource>,
    warnings: Vec<Warning>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("size", &self.tape.len())
            .field("pointer", &self.pointer)
            .field("output_file", &self.output_file)
            .field("echo", &self.echo)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine with `size` zeroed cells.
    ///
    /// Echo to stdout is enabled and `,` reads from the process stdin.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        if size == 0 {
            return Err(EngineError::InvalidSize { size });
        }
        Ok(Self {
            tape: vec![0; size],
            pointer: 0,
            code_ptr: 0,
            loop_stack: Vec::new(),
            output: String::new(),
            output_file: None,
            echo: true,
            input: Box::new(StdinKeys),
            warnings: Vec::new(),
        })
    }

    /// Replace the key source used by `,`.
    pub fn set_input_source<S>(&mut self, source: S)
    where
        S: KeySource + 'static,
    {
        self.input = Box::new(source);
    }

    /// Same as [`Engine::set_input_source`] for a boxed source.
    pub fn set_boxed_input_source(&mut self, source: Box<dyn KeySource>) {
        self.input = source;
    }

    /// Provide `,` input from a closure.
    pub fn set_input_provider<F>(&mut self, provider: F)
    where
        F: FnMut() -> io::Result<InputEvent> + 'static,
    {
        self.input = Box::new(provider);
    }

    pub fn size(&self) -> usize {
        self.tape.len()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[i64] {
        &self.tape
    }

    pub fn read_current_cell(&self) -> i64 {
        self.tape[self.pointer]
    }

    pub fn write_current_cell(&mut self, value: i64) {
        self.tape[self.pointer] = value;
    }

    pub fn enable_echo(&mut self) {
        self.echo = true;
    }

    /// Stop `.` from printing to stdout. Output is still returned by
    /// [`Engine::interpret`] and written to the output file.
    pub fn disable_echo(&mut self) {
        self.echo = false;
    }

    pub fn is_echo_enabled(&self) -> bool {
        self.echo
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// Mirror every future `.` into the file at `path`.
    ///
    /// A missing file is created with [`OUTPUT_FILE_HEADER`]; an existing one
    /// is left as is and appended to.
    pub fn set_output_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EngineError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            fs::write(&path, OUTPUT_FILE_HEADER).map_err(|source| EngineError::Io {
                path: path.clone(),
                source,
            })?;
            debug!("created output file {}", path.display());
        }
        debug!("mirroring output to {}", path.display());
        self.output_file = Some(path);
        Ok(())
    }

    /// Zero the tape and move the data pointer back to cell 0.
    ///
    /// The output file and echo flag are kept.
    pub fn reset(&mut self) {
        self.tape.fill(0);
        self.pointer = 0;
        self.loop_stack.clear();
        self.code_ptr = 0;
        debug!("engine reset ({} cells)", self.tape.len());
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.tape.clone(),
            pointer: self.pointer,
        }
    }

    /// Restore tape and pointer from `snapshot`.
    ///
    /// A snapshot taken from an engine of another size is resized to fit, and
    /// the pointer is clamped into the tape.
    pub fn restore(&mut self, snapshot: Snapshot) {
        let size = self.tape.len();
        self.tape = snapshot.cells;
        self.tape.resize(size, 0);
        self.pointer = snapshot.pointer.min(size - 1);
    }

    /// Drain the warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Read the program at `path` and interpret it.
    pub fn interpret_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String, EngineError> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.interpret(&code)
    }

    /// Execute `text` and return everything it printed.
    ///
    /// Tape and pointer persist across calls; code pointer and loop stack do
    /// not.
    pub fn interpret(&mut self, text: &str) -> Result<String, EngineError> {
        let code: Vec<char> = text.chars().collect();
        self.output.clear();

        let result = validate_brackets(&code).and_then(|()| self.execute(&code));

        self.code_ptr = 0;
        self.loop_stack.clear();
        // A failed call leaves its partial output readable until the next one.
        result.map(|()| std::mem::take(&mut self.output))
    }

    /// Output produced by the last call before it failed.
    pub fn partial_output(&self) -> &str {
        &self.output
    }

    fn push_warning(&mut self, warning: Warning) {
        debug!("{warning}");
        self.warnings.push(warning);
    }

    fn execute(&mut self, code: &[char]) -> Result<(), EngineError> {
        while self.code_ptr < code.len() {
            match code[self.code_ptr] {
                '>' => self.pointer = (self.pointer + 1) % self.tape.len(),
                '<' => {
                    self.pointer = match self.pointer {
                        0 => self.tape.len() - 1,
                        p => p - 1,
                    }
                }
                '+' => {
                    let cell = &mut self.tape[self.pointer];
                    *cell = cell.wrapping_add(1);
                }
                '-' => {
                    let cell = &mut self.tape[self.pointer];
                    *cell = cell.wrapping_sub(1);
                }
                '.' => self.emit()?,
                ',' => self.read_input()?,
                '[' => {
                    if self.read_current_cell() != 0 {
                        self.loop_stack.push(self.code_ptr);
                    } else {
                        let offset = match_closing_bracket(&code[self.code_ptr..]).map_err(|_| {
                            EngineError::UnmatchedBracket {
                                ip: self.code_ptr,
                                kind: BracketKind::Open,
                            }
                        })?;
                        self.code_ptr += offset;
                    }
                }
                ']' => {
                    let Some(open) = self.loop_stack.pop() else {
                        return Err(EngineError::UnmatchedBracket {
                            ip: self.code_ptr,
                            kind: BracketKind::Close,
                        });
                    };
                    // Back onto the '[' so it tests the cell again.
                    self.code_ptr = open;
                    continue;
                }
                _ => {}
            }
            self.code_ptr += 1;
        }
        Ok(())
    }

    fn emit(&mut self) -> Result<(), EngineError> {
        let value = self.read_current_cell();
        let ch = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or(EngineError::InvalidCodePoint {
                ip: self.code_ptr,
                value,
            })?;

        self.output.push(ch);

        let sink_failure = self.output_file.as_ref().and_then(|path| {
            append_char(path, ch).err().map(|source| Warning::SinkWrite {
                path: path.clone(),
                source,
            })
        });
        if let Some(warning) = sink_failure {
            self.push_warning(warning);
        }

        if self.echo {
            let mut stdout = io::stdout().lock();
            // Console echo is best effort; the buffer and file keep the output.
            let _ = write!(stdout, "{ch}").and_then(|()| stdout.flush());
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<(), EngineError> {
        let ip = self.code_ptr;
        let event = self
            .input
            .read_key()
            .map_err(|source| EngineError::Input { ip, source })?;

        match event {
            InputEvent::Text(text) => {
                let mut chars = text.chars();
                let Some(first) = chars.next() else {
                    self.write_current_cell(0);
                    return Ok(());
                };
                let discarded = chars.count();
                if discarded > 0 {
                    self.push_warning(Warning::MultiCharInput {
                        ip,
                        used: first,
                        discarded,
                    });
                }
                self.write_current_cell(i64::from(u32::from(first)));
            }
            InputEvent::Closed => {
                debug!("input closed at instruction {ip}; storing 0");
                self.write_current_cell(0);
            }
            InputEvent::Interrupted => return Err(EngineError::Interrupted { ip }),
        }
        Ok(())
    }
}

fn append_char(path: &Path, ch: char) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    write!(file, "{ch}")
}

/// Offset of the `]` closing the `[` that starts `text`.
///
/// The nesting level starts at 1 for the leading bracket; every `[` raises it
/// and every `]` lowers it. Fails with [`EngineError::NotAtLoopStart`] when
/// `text` does not begin with `[`, and with an unmatched `'['` error when the
/// text runs out first.
pub fn match_closing_bracket(text: &[char]) -> Result<usize, EngineError> {
    if text.first() != Some(&'[') {
        return Err(EngineError::NotAtLoopStart);
    }

    let mut level = 1usize;
    for (offset, &ch) in text.iter().enumerate().skip(1) {
        match ch {
            '[' => level += 1,
            ']' => {
                level -= 1;
                if level == 0 {
                    return Ok(offset);
                }
            }
            _ => {}
        }
    }

    Err(EngineError::UnmatchedBracket {
        ip: 0,
        kind: BracketKind::Open,
    })
}

/// Check that every bracket in `code` has a partner, reporting the first
/// unmatched `]` or the innermost unmatched `[`.
fn validate_brackets(code: &[char]) -> Result<(), EngineError> {
    let mut open: Vec<usize> = Vec::new();
    for (ip, &ch) in code.iter().enumerate() {
        match ch {
            '[' => open.push(ip),
            ']' => {
                if open.pop().is_none() {
                    return Err(EngineError::UnmatchedBracket {
                        ip,
                        kind: BracketKind::Close,
                    });
                }
            }
            _ => {}
        }
    }

    match open.last() {
        Some(&ip) => Err(EngineError::UnmatchedBracket {
            ip,
            kind: BracketKind::Open,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn engine(size: usize) -> Engine {
        let mut engine = Engine::new(size).unwrap();
        engine.disable_echo();
        engine
    }

    fn scripted(engine: &mut Engine, events: Vec<InputEvent>) {
        let mut events = VecDeque::from(events);
        engine.set_input_provider(move || Ok(events.pop_front().unwrap_or(InputEvent::Closed)));
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn new_engine_has_zeroed_tape_of_requested_size() {
        for size in [1, 100, 666, 10_000, 456_789] {
            let engine = engine(size);
            assert_eq!(engine.size(), size);
            assert_eq!(engine.cells().len(), size);
            assert!(engine.cells().iter().all(|&c| c == 0));
            assert_eq!(engine.pointer(), 0);
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(Engine::new(0), Err(EngineError::InvalidSize { size: 0 })));
    }

    #[test]
    fn pointer_moves_forward_and_back() {
        let mut e = engine(100);
        e.interpret(">").unwrap();
        assert_eq!(e.pointer(), 1);
        e.interpret(">>>").unwrap();
        assert_eq!(e.pointer(), 4);
        e.interpret("<<").unwrap();
        assert_eq!(e.pointer(), 2);
    }

    #[test]
    fn pointer_wraps_in_both_directions() {
        let mut e = engine(100);
        e.interpret("<").unwrap();
        assert_eq!(e.pointer(), 99);
        e.interpret(">").unwrap();
        assert_eq!(e.pointer(), 0);
    }

    #[test]
    fn single_cell_tape_keeps_pointer_at_zero() {
        let mut e = engine(1);
        e.interpret("><<>>").unwrap();
        assert_eq!(e.pointer(), 0);
    }

    #[test]
    fn increments_and_decrements_are_additive_and_signed() {
        let mut e = engine(10);
        e.interpret("+++++").unwrap();
        assert_eq!(e.read_current_cell(), 5);
        e.interpret("--------").unwrap();
        assert_eq!(e.read_current_cell(), -3);

        let mut e = engine(10);
        e.interpret(&"+".repeat(300)).unwrap();
        assert_eq!(e.read_current_cell(), 300);
    }

    #[test]
    fn changes_several_cells() {
        let mut e = engine(10);
        e.interpret("+++>--->+-+-").unwrap();
        assert_eq!(&e.cells()[..3], &[3, -3, 0]);
        e.interpret("<<+>+++++").unwrap();
        assert_eq!(&e.cells()[..3], &[4, 2, 0]);
    }

    #[test]
    fn loop_moves_value_into_next_cell() {
        let mut e = engine(10);
        e.interpret("+++[>++<-]").unwrap();
        assert_eq!(&e.cells()[..2], &[0, 6]);

        e.reset();
        e.interpret("+++[>++<-]>[>++<-]").unwrap();
        assert_eq!(&e.cells()[..3], &[0, 0, 12]);
    }

    #[test]
    fn nested_loops_run() {
        let mut e = engine(10);
        e.interpret("++[>++[>+<-]<-]").unwrap();
        assert_eq!(&e.cells()[..3], &[0, 0, 4]);
    }

    #[test]
    fn loop_on_zero_cell_is_skipped() {
        let mut e = engine(10);
        e.interpret("[+++[>+<-]]+").unwrap();
        assert_eq!(&e.cells()[..2], &[1, 0]);
    }

    #[test]
    fn output_is_returned_as_string() {
        let mut e = engine(10);
        let out = e.interpret(&format!("{}.+.+.", "+".repeat(65))).unwrap();
        assert_eq!(out, "ABC");
        assert_eq!(e.interpret("").unwrap(), "");
    }

    #[test]
    fn negative_cell_cannot_be_printed() {
        let mut e = engine(10);
        let err = e.interpret("-.").unwrap_err();
        assert!(matches!(err, EngineError::InvalidCodePoint { ip: 1, value: -1 }));
    }

    #[test]
    fn output_file_is_appended_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "").unwrap();

        let mut e = engine(10);
        e.set_output_file(&path).unwrap();
        e.interpret(&"+".repeat(65)).unwrap();
        e.interpret(".").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A");
        e.interpret(".").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "AA");
        e.interpret("+.+.+.+.").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "AABCDE");
    }

    #[test]
    fn output_file_gets_header_only_when_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.txt");

        let mut e = engine(10);
        e.set_output_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), OUTPUT_FILE_HEADER);

        e.interpret(&format!("{}.", "+".repeat(66))).unwrap();
        e.set_output_file(&path).unwrap();
        let expected = format!("{OUTPUT_FILE_HEADER}B");
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn output_file_failure_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");

        let mut e = engine(10);
        e.set_output_file(&path).unwrap();
        drop(dir);

        let out = e.interpret(&format!("{}.", "+".repeat(65))).unwrap();
        assert_eq!(out, "A");
        let warnings = e.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Warning::SinkWrite { .. }));
        assert!(e.take_warnings().is_empty());
    }

    #[test]
    fn warnings_accumulate_once_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");

        let mut e = engine(10);
        e.set_output_file(&path).unwrap();
        drop(dir);

        e.interpret(&format!("{}.", "+".repeat(65))).unwrap();
        e.interpret("").unwrap();
        e.interpret(".").unwrap();
        assert_eq!(e.take_warnings().len(), 2);
    }

    #[test]
    fn failed_call_keeps_partial_output() {
        let mut e = engine(10);
        let err = e.interpret(&format!("{}.>-.", "+".repeat(65))).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCodePoint { value: -1, .. }));
        assert_eq!(e.partial_output(), "A");

        assert!(e.interpret("+]").is_err());
        assert_eq!(e.partial_output(), "");
        assert_eq!(e.interpret("").unwrap(), "");
    }

    #[test]
    fn input_stores_code_point() {
        for (input, expected) in [("A", 65), ("B", 66), ("C", 67), ("+", 43), ("a", 97), ("\\", 92)] {
            let mut e = engine(10);
            scripted(&mut e, vec![InputEvent::Text(input.to_string())]);
            e.interpret(",").unwrap();
            assert_eq!(e.read_current_cell(), expected, "input {input:?}");
            assert!(e.take_warnings().is_empty());
        }
    }

    #[test]
    fn multi_char_input_keeps_first_char_and_warns() {
        let mut e = engine(10);
        scripted(&mut e, vec![InputEvent::Text("xyz".to_string())]);
        e.interpret(",").unwrap();
        assert_eq!(e.read_current_cell(), 120);
        let warnings = e.take_warnings();
        assert!(matches!(
            warnings.as_slice(),
            [Warning::MultiCharInput { ip: 0, used: 'x', discarded: 2 }]
        ));
    }

    #[test]
    fn closed_input_stores_zero() {
        let mut e = engine(10);
        scripted(&mut e, vec![InputEvent::Closed]);
        e.interpret("+++++,").unwrap();
        assert_eq!(e.read_current_cell(), 0);
    }

    #[test]
    fn interrupted_input_is_an_error() {
        let mut e = engine(10);
        scripted(&mut e, vec![InputEvent::Interrupted]);
        let err = e.interpret("+,").unwrap_err();
        assert!(matches!(err, EngineError::Interrupted { ip: 1 }));
        assert_eq!(e.read_current_cell(), 1);
    }

    #[test]
    fn input_echo_program() {
        let mut e = engine(10);
        scripted(
            &mut e,
            vec![InputEvent::Text("h".to_string()), InputEvent::Text("i".to_string())],
        );
        assert_eq!(e.interpret(",.,.").unwrap(), "hi");
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut e = engine(10);
        e.interpret("+++>+++>+++").unwrap();
        assert_eq!(&e.cells()[..3], &[3, 3, 3]);
        e.reset();
        assert!(e.cells().iter().all(|&c| c == 0));
        assert_eq!(e.pointer(), 0);
        e.reset();
        assert!(e.cells().iter().all(|&c| c == 0));
        e.interpret("++>++>++").unwrap();
        assert_eq!(&e.cells()[..3], &[2, 2, 2]);
    }

    #[test]
    fn reset_keeps_output_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut e = engine(10);
        e.set_output_file(&path).unwrap();
        e.reset();
        assert_eq!(e.output_file(), Some(path.as_path()));
        assert!(!e.is_echo_enabled());
    }

    #[test]
    fn comments_are_ignored() {
        let mut plain = engine(10);
        plain.interpret("+++[>++<-]>+").unwrap();

        let mut commented = engine(10);
        commented
            .interpret("three +++ loop [ move > double ++ back < dec - ] then > and +\n")
            .unwrap();

        assert_eq!(plain.cells(), commented.cells());
        assert_eq!(plain.pointer(), commented.pointer());
    }

    #[test]
    fn chained_calls_match_single_call() {
        let mut whole = engine(10);
        whole.interpret("++>+++[<+>-]<<-").unwrap();

        let mut pieces = engine(10);
        pieces.interpret("++>").unwrap();
        pieces.interpret("+++[<+>-]").unwrap();
        pieces.interpret("<<-").unwrap();

        assert_eq!(whole.cells(), pieces.cells());
        assert_eq!(whole.pointer(), pieces.pointer());
    }

    #[test]
    fn unmatched_open_bracket_is_reported_before_running() {
        let mut e = engine(10);
        let err = e.interpret("++[>+").unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnmatchedBracket { ip: 2, kind: BracketKind::Open }
        ));
        assert!(e.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn unmatched_close_bracket_is_reported() {
        let mut e = engine(10);
        let err = e.interpret("+]").unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnmatchedBracket { ip: 1, kind: BracketKind::Close }
        ));
    }

    #[test]
    fn engine_is_reusable_after_error() {
        let mut e = engine(10);
        assert!(e.interpret("[").is_err());
        e.interpret("+[-]+").unwrap();
        assert_eq!(e.read_current_cell(), 1);
    }

    #[test]
    fn current_cell_accessors() {
        let mut e = engine(4);
        e.interpret(">>").unwrap();
        e.write_current_cell(42);
        assert_eq!(e.read_current_cell(), 42);
        assert_eq!(e.cells(), &[0, 0, 42, 0]);
    }

    #[test]
    fn snapshot_and_restore() {
        let mut e = engine(4);
        e.interpret("+>++").unwrap();
        let snap = e.snapshot();
        e.interpret(">+++<<").unwrap();
        e.restore(snap);
        assert_eq!(e.cells(), &[1, 2, 0, 0]);
        assert_eq!(e.pointer(), 1);
    }

    #[test]
    fn interpret_file_runs_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.bf");
        fs::write(&path, "+++ > +++ > +++\n").unwrap();

        let mut e = engine(10);
        e.interpret_file(&path).unwrap();
        assert_eq!(&e.cells()[..3], &[3, 3, 3]);
    }

    #[test]
    fn interpret_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = engine(10);
        let err = e.interpret_file(dir.path().join("missing.bf")).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn matching_bracket_offsets() {
        assert_eq!(match_closing_bracket(&chars("[]")).unwrap(), 1);
        assert_eq!(match_closing_bracket(&chars("[+[-]>]<]")).unwrap(), 6);
        assert_eq!(match_closing_bracket(&chars("[[[]]]")).unwrap(), 5);
    }

    #[test]
    fn matching_bracket_requires_leading_bracket() {
        assert!(matches!(
            match_closing_bracket(&chars("+[]")),
            Err(EngineError::NotAtLoopStart)
        ));
        assert!(matches!(match_closing_bracket(&[]), Err(EngineError::NotAtLoopStart)));
    }

    #[test]
    fn matching_bracket_fails_when_unbalanced() {
        assert!(matches!(
            match_closing_bracket(&chars("[[]")),
            Err(EngineError::UnmatchedBracket { kind: BracketKind::Open, .. })
        ));
    }
}
