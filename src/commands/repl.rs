use std::io::{self, IsTerminal, Write};
use brainf::input::{stdin_key_source, StdinLines};
use brainf::repl::{select_mode, EditorLines, ReplMode};
use brainf::{Engine, LineSource, Session};
use log::debug;

use super::Options;

/// Interactive mode: run the REPL session until `quit`, Ctrl+C or EOF.
pub fn run(program: &str, options: &Options) -> i32 {
    // Determine mode: env -> auto-detect via is_terminal()
    let mode = match select_mode() {
        Ok(m) => m,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            return 1;
        }
    };
    debug!("interactive mode {mode:?}");

    // SIGINT outside the editor's raw mode: announce, flush and exit(0)
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\nINFO :: Quitting...");
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    let mut engine = match Engine::new(options.size) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 2;
        }
    };
    engine.set_boxed_input_source(stdin_key_source());

    if let Some(output) = options.output.as_ref() {
        if let Err(e) = engine.set_output_file(output) {
            eprintln!("{program}: failed to prepare output file: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    }

    let result = match mode {
        ReplMode::Editor => EditorLines::new().and_then(|lines| start_session(engine, lines, options)),
        ReplMode::Plain => start_session(engine, StdinLines, options),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{program}: REPL error: {e}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn start_session<L: LineSource>(engine: Engine, lines: L, options: &Options) -> io::Result<()> {
    let styled = options.color && io::stdout().is_terminal();
    Session::new(engine, lines, io::stdout())
        .with_radius(options.radius)
        .with_style(styled)
        .start()
}
