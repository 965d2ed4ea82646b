mod commands;

use brainf::config;
use clap::Parser;
use log::debug;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::commands::Options;

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] <FILE>   # Run the Brainfuck program in FILE
  {0} [OPTIONS]          # Start the interactive interpreter

Options:
  --output, -o <PATH>  Also append every printed character to PATH
                       (created with a header line if it does not exist)
  --size,   -s <N>     Number of tape cells (default 30000)
  --help,   -h         Show this help

Interactive commands:
  reset   Zero the tape and move the pointer back to cell 0
  undo    Restore the tape as it was before the last executed line
  quit    Leave the interpreter (Ctrl+C and Ctrl+D work too)

Notes:
- Characters other than ><+-.,[] are ignored and may be used as comments.
- Cells hold signed integers and are not wrapped to a byte; the pointer
  wraps around both ends of the tape.
- Input (`,`) reads a single key; on EOF the current cell is set to 0.

Environment:
  BRAINF_TAPE_SIZE, BRAINF_OUTPUT   Defaults for --size and --output
  BRAINF_REPL_MODE=plain|editor     Force the interactive input mode
  RUST_LOG                          Log filter (default: warn)
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "brainf", disable_help_flag = true)]
struct Cli {
    /// Program to run; the interactive interpreter starts when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Also append every printed character to PATH
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Number of tape cells
    #[arg(short = 's', long = "size", value_name = "N")]
    size: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("brainf"));

    let cli = Cli::parse();

    if cli.help {
        usage_and_exit(&program, 0);
    }

    let settings = config::settings();
    let options = Options {
        size: settings.tape_size(cli.size),
        output: settings.output_path(cli.output),
        radius: settings.radius,
        color: settings.color,
    };
    debug!("resolved options: {options:?}");

    if options.size == 0 {
        eprintln!("{program}: --size must be a positive number of cells");
        usage_and_exit(&program, 2);
    }

    let code = match cli.file {
        Some(path) => commands::run::run(&program, &path, &options),
        None => commands::repl::run(&program, &options),
    };

    std::process::exit(code);
}
