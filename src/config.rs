use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use cross_xdg::BaseDirs;
use log::{debug, warn};

use crate::display::DEFAULT_RADIUS;
use crate::engine::DEFAULT_TAPE_SIZE;

/// Environment variable overriding the tape size.
pub const ENV_TAPE_SIZE: &str = "BRAINF_TAPE_SIZE";
/// Environment variable overriding the output file.
pub const ENV_OUTPUT: &str = "BRAINF_OUTPUT";

/// Values read from `brainf.toml` in the user's config directory.
///
/// ```toml
/// [interpreter]
/// size = 30000
/// output = "/tmp/brainf.out"
///
/// [display]
/// radius = 4
/// color = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub size: Option<usize>,
    pub output: Option<PathBuf>,
    pub radius: usize,
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: None,
            output: None,
            radius: DEFAULT_RADIUS,
            color: true,
        }
    }
}

impl Settings {
    /// Tape size: flag, then `BRAINF_TAPE_SIZE`, then the config file, then 30,000.
    pub fn tape_size(&self, flag: Option<usize>) -> usize {
        let from_env = env::var(ENV_TAPE_SIZE).ok().and_then(|s| s.trim().parse::<usize>().ok());
        flag.or(from_env).or(self.size).unwrap_or(DEFAULT_TAPE_SIZE)
    }

    /// Output file: flag, then `BRAINF_OUTPUT`, then the config file.
    pub fn output_path(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        let from_env = env::var_os(ENV_OUTPUT).filter(|v| !v.is_empty()).map(PathBuf::from);
        flag.or(from_env).or_else(|| self.output.clone())
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| load_from_toml().unwrap_or_default())
}

fn load_from_toml() -> Option<Settings> {
    let base_dirs = BaseDirs::new().ok()?;

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let config_home = base_dirs.config_home();

    let mut path = PathBuf::from(config_home);
    path.push("brainf.toml");

    let content = fs::read_to_string(&path).ok()?;
    debug!("loading settings from {}", path.display());
    Some(parse_settings(&content))
}

/// Parse the small `[section]` / `key = value` subset used by `brainf.toml`.
///
/// Unknown keys are ignored; invalid values keep their defaults.
pub fn parse_settings(content: &str) -> Settings {
    let mut section = String::new();
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len()-1].trim().to_string();
            continue;
        }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim();
            let val_raw = line[eq+1..].trim();
            // Accept quoted or unquoted
            let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                val_raw[1..val_raw.len()-1].to_string()
            } else { val_raw.to_string() };
            map.insert(format!("{section}.{key}"), val);
        }
    }

    let mut cfg = Settings::default();

    macro_rules! set {
        ($field:ident, $key:literal, $parse:expr) => {
            if let Some(raw) = map.get($key) {
                match $parse(raw.as_str()) {
                    Some(v) => cfg.$field = v,
                    None => warn!("ignoring invalid value {raw:?} for {}", $key),
                }
            }
        };
    }

    set!(size, "interpreter.size", |s: &str| s.parse::<usize>().ok().filter(|&n| n > 0).map(Some));
    set!(output, "interpreter.output", |s: &str| (!s.is_empty()).then(|| Some(PathBuf::from(s))));
    set!(radius, "display.radius", |s: &str| s.parse::<usize>().ok());
    set!(color, "display.color", |s: &str| s.parse::<bool>().ok());

    cfg
}
