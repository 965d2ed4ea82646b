#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;

/// The `brainf` binary with an isolated config directory and no overrides
/// inherited from the caller's environment.
pub fn brainf(config_home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("brainf").expect("brainf binary");
    cmd.env("HOME", config_home.path())
        .env("XDG_CONFIG_HOME", config_home.path().join(".config"))
        .env_remove("BRAINF_TAPE_SIZE")
        .env_remove("BRAINF_OUTPUT")
        .env_remove("BRAINF_REPL_MODE")
        .env_remove("RUST_LOG");
    cmd
}

pub fn program_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

/// Program printing `A` (65).
pub fn print_a() -> String {
    format!("{}.", "+".repeat(65))
}

/// Write `brainf.toml` where the binary looks for it under `config_home`.
pub fn write_config(config_home: &tempfile::TempDir, content: &str) {
    let dir = config_home.path().join(".config");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("brainf.toml"), content).unwrap();
}
