//! A Brainfuck interpreter with a batch runner and an interactive REPL.
//!
//! - [`Engine`] executes programs on a wrapping tape of signed cells and keeps
//!   its state between calls.
//! - [`Session`] drives an engine line by line, showing the tape window after
//!   every step and supporting `reset`, `undo` and `quit`.
//!
//! Quick start:
//!
//! ```
//! use brainf::Engine;
//!
//! let mut engine = Engine::new(30_000).unwrap();
//! engine.disable_echo();
//! engine.interpret("+++[>++<-]").unwrap();
//! assert_eq!(&engine.cells()[..2], &[0, 6]);
//! ```

pub mod cli_util;
pub mod config;
pub mod display;
pub mod engine;
pub mod input;
pub mod repl;
pub mod session;
pub mod theme;

pub use display::{RenderedTape, TapeView};
pub use engine::{
    match_closing_bracket, BracketKind, Engine, EngineError, Snapshot, Warning, DEFAULT_TAPE_SIZE,
};
pub use input::{InputEvent, KeySource, LineSource};
pub use session::{Command, Session, SessionState};
