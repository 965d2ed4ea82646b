use std::path::PathBuf;

pub mod repl;
pub mod run;

/// Settings resolved from flags, environment and the config file.
#[derive(Debug, Clone)]
pub struct Options {
    pub size: usize,
    pub output: Option<PathBuf>,
    pub radius: usize,
    pub color: bool,
}
