use std::io::{self, Write};
use crate::engine::{EngineError, Warning};

/// Pretty-print an [`EngineError`] to stderr with caret positioning.
/// If `program` is `Some("brainf")`, messages are prefixed with "brainf: ..."
pub fn print_engine_error(program: Option<&str>, code: &str, err: &EngineError) {
    let mut stderr = io::stderr().lock();
    let _ = write_engine_error(&mut stderr, program, code, err);
    let _ = stderr.flush();
}

/// Write an [`EngineError`] to `out`; errors tied to an instruction get a
/// context window with a caret under the offending character.
pub fn write_engine_error<W: Write>(
    out: &mut W,
    program: Option<&str>,
    code: &str,
    err: &EngineError,
) -> io::Result<()> {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        EngineError::UnmatchedBracket { ip, kind } => {
            let msg = prefix_program(&format!("Parse error: unmatched bracket {kind}"));
            write_error_with_context(out, &msg, code, *ip)
        }
        EngineError::InvalidCodePoint { ip, value } => {
            let msg = prefix_program(&format!(
                "Runtime error: cell value {value} is not a printable character"
            ));
            write_error_with_context(out, &msg, code, *ip)
        }
        EngineError::Interrupted { ip } => {
            let msg = prefix_program("Input interrupted");
            write_error_with_context(out, &msg, code, *ip)
        }
        EngineError::Input { ip, source } => {
            let msg = prefix_program(&format!("I/O error: {source}"));
            write_error_with_context(out, &msg, code, *ip)
        }
        EngineError::Io { .. } => writeln!(out, "{}", prefix_program(&format!("I/O error: {err}"))),
        EngineError::InvalidSize { .. } | EngineError::NotAtLoopStart => {
            writeln!(out, "{}", prefix_program(&err.to_string()))
        }
    }
}

/// Print a recovered [`Warning`] to stderr.
pub fn print_warning(program: Option<&str>, warning: &Warning) {
    match program {
        Some(p) => eprintln!("{p}: warning: {warning}"),
        None => eprintln!("warning: {warning}"),
    }
    let _ = io::stderr().flush();
}

/// Write a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn write_error_with_context<W: Write>(out: &mut W, prefix: &str, code: &str, pos: usize) -> io::Result<()> {
    writeln!(out, "{prefix} at instruction {pos}")?;

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    // Newlines would break the caret alignment.
    let slice: String = code[start_byte..end_byte]
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    writeln!(out, "  {}", slice)?;

    // Caret under the exact position
    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}^", " ".repeat(caret_offset_chars));
    writeln!(out, "  {}", underline)
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(byte_idx, _)| byte_idx)
}
