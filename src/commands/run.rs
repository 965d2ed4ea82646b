use std::fs;
use std::io::{self, Write};
use std::path::Path;
use brainf::cli_util::{print_engine_error, print_warning};
use brainf::input::stdin_key_source;
use brainf::{Engine, EngineError};
use log::debug;

use super::Options;

/// Batch mode: run the program in `path` with output echoed to stdout.
///
/// Returns the process exit code: 0 on success, 1 when the program could not
/// be loaded or failed while running.
pub fn run(program: &str, path: &Path, options: &Options) -> i32 {
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

    debug!("running {} on {} cells", path.display(), engine.size());
    let result = engine.interpret_file(path);

    for warning in engine.take_warnings() {
        print_warning(Some(program), &warning);
    }

    match result {
        Ok(output) => {
            // For readability, ensure output ends with a newline
            if !output.is_empty() && !output.ends_with('\n') {
                println!();
            }
            let _ = io::stdout().flush();
            0
        }
        Err(err @ EngineError::Io { .. }) => {
            eprintln!("{program}: failed to read program file: {err}");
            let _ = io::stderr().flush();
            1
        }
        Err(err) => {
            // Keep stdout's partial output on its own line
            let partial = engine.partial_output();
            if !partial.is_empty() && !partial.ends_with('\n') {
                println!();
            }
            let _ = io::stdout().flush();
            let code = fs::read_to_string(path).unwrap_or_default();
            print_engine_error(Some(program), &code, &err);
            1
        }
    }
}
