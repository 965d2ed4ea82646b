use std::env;
use std::io::{self, IsTerminal};
use reedline::{
    DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Highlighter, Reedline, Signal, StyledText,
};
use nu_ansi_term::Style;
use crate::input::{InputEvent, LineSource};

/// Environment variable forcing the REPL input mode (`plain` or `editor`).
pub const ENV_REPL_MODE: &str = "BRAINF_REPL_MODE";

/// Line source backed by a reedline editor: syntax highlighting, in-memory
/// history and an `[In N]` prompt.
pub struct EditorLines {
    editor: Reedline,
}

impl EditorLines {
    pub fn new() -> io::Result<Self> {
        Ok(Self { editor: init_line_editor()? })
    }
}

impl LineSource for EditorLines {
    fn read_line(&mut self, exec_line: usize) -> io::Result<InputEvent> {
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(format!("[In {exec_line}]")),
            DefaultPromptSegment::Empty,
        );

        match self.editor.read_line(&prompt)? {
            Signal::Success(buffer) => Ok(InputEvent::Text(buffer)),
            Signal::CtrlC => Ok(InputEvent::Interrupted),
            Signal::CtrlD => Ok(InputEvent::Closed),
        }
    }
}

fn init_line_editor() -> io::Result<Reedline> {
    use reedline::{default_emacs_keybindings, Emacs, KeyCode, KeyModifiers, ReedlineEvent};

    // Start from default emacs-like bindings: Enter submits the line, Ctrl+D
    // on an empty line closes the session.
    let mut keybindings = default_emacs_keybindings();

    // Alt+Up/Alt+Down or Ctrl+Up/Ctrl+Down to navigate history items.
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Down, ReedlineEvent::NextHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Down, ReedlineEvent::NextHistory);

    let history = FileBackedHistory::new(1_000).map_err(|e| io::Error::other(e.to_string()))?;

    let editor = Reedline::create()
        .with_highlighter(Box::new(LineHighlighter::new_catppuccin_mocha()))
        .with_history(Box::new(history))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    Ok(editor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    /// Plain line reads from stdin; no prompt editing.
    Plain,
    Editor,
}

/// Pick the REPL input mode: `BRAINF_REPL_MODE` first, then auto-detect
/// (editor when stdin is a TTY).
pub fn select_mode() -> Result<ReplMode, String> {
    let stdin_is_tty = io::stdin().is_terminal();
    mode_from(env::var(ENV_REPL_MODE).ok().as_deref(), stdin_is_tty)
}

fn mode_from(env_value: Option<&str>, stdin_is_tty: bool) -> Result<ReplMode, String> {
    if let Some(val) = env_value {
        let v = val.trim().to_ascii_lowercase();
        return match v.as_str() {
            "plain" => Ok(ReplMode::Plain),
            "editor" => {
                if !stdin_is_tty {
                    return Err(format!("cannot start editor: stdin is not a TTY (use {ENV_REPL_MODE}=plain)"));
                }
                Ok(ReplMode::Editor)
            }
            _ => Err(format!("invalid {ENV_REPL_MODE} value: {val}, must be 'plain' or 'editor'")),
        };
    }

    if stdin_is_tty {
        Ok(ReplMode::Editor)
    } else {
        Ok(ReplMode::Plain)
    }
}

#[derive(Default)]
struct LineHighlighter {
    // Per-char styles for BF commands, and a fallback for non-commands
    map_plus: Style,
    map_minus: Style,
    map_lt: Style,
    map_gt: Style,
    map_dot: Style,
    map_comma: Style,
    map_bracket: Style,
    map_command: Style,
    map_other: Style,
}

impl LineHighlighter {
    fn new_catppuccin_mocha() -> Self {
        use crate::theme::catppuccin::Mocha as P;

        // > <   => SKY/TEAL (movement)
        // + -   => GREEN/RED (data modification)
        // . ,   => YELLOW/PEACH (I/O)
        // [ ]   => MAUVE (flow control)
        // reset/undo/quit => BLUE (session commands)
        Self {
            map_gt: Style::new().fg(P::SKY).bold(),
            map_lt: Style::new().fg(P::TEAL).bold(),
            map_plus: Style::new().fg(P::GREEN).bold(),
            map_minus: Style::new().fg(P::RED).bold(),
            map_dot: Style::new().fg(P::YELLOW).bold(),
            map_comma: Style::new().fg(P::PEACH).bold(),
            map_bracket: Style::new().fg(P::MAUVE).bold(),
            map_command: Style::new().fg(P::BLUE).bold(),
            map_other: Style::new().fg(P::SURFACE2),
        }
    }

    #[inline]
    fn style_for(&self, ch: char) -> Style {
        match ch {
            '>' => self.map_gt,
            '<' => self.map_lt,
            '+' => self.map_plus,
            '-' => self.map_minus,
            '.' => self.map_dot,
            ',' => self.map_comma,
            '[' | ']' => self.map_bracket,
            _ => self.map_other,
        }
    }
}

impl Highlighter for LineHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut out: StyledText = StyledText::new();

        if matches!(line.trim(), "reset" | "undo" | "quit") {
            out.push((self.map_command, line.to_string()));
            return out;
        }

        let mut current_style: Option<Style> = None;
        let mut buffer = String::new();

        for ch in line.chars() {
            let style = self.style_for(ch);

            match current_style {
                Some(s) if s == style => buffer.push(ch),
                Some(s) => {
                    out.push((s, std::mem::take(&mut buffer)));
                    current_style = Some(style);
                    buffer.push(ch);
                }
                None => {
                    current_style = Some(style);
                    buffer.push(ch);
                }
            }
        }

        if let Some(s) = current_style {
            if !buffer.is_empty() {
                out.push((s, buffer));
            }
        }
        out
    }
}
