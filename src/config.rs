use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use cross_xdg::BaseDirs;

use crate::tape::{DEFAULT_MAX_TAPE_CELLS, DEFAULT_TAPE_CELLS};

/// Interpreter settings.
///
/// Resolution order, lowest to highest precedence: built-in defaults, the
/// `[interpreter]` section of `bf.toml`, `BF_*` environment variables, and
/// finally whatever the caller applies from command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub initial_tape_cells: usize,
    pub max_tape_cells: usize,
    /// Report loops still open when the program ends instead of ignoring them.
    pub strict_loops: bool,
    pub max_steps: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_tape_cells: DEFAULT_TAPE_CELLS,
            max_tape_cells: DEFAULT_MAX_TAPE_CELLS,
            strict_loops: false,
            max_steps: None,
            timeout_ms: None,
        }
    }
}

impl Settings {
    /// Defaults, then the config file (if any), then the environment.
    pub fn load() -> Self {
        let mut settings = Self::default();
        if let Some(content) = read_config_file() {
            settings.apply_toml(&content);
        }
        settings.apply_env(|key| env::var(key).ok());
        settings
    }

    /// Apply keys from the `[interpreter]` section of a `bf.toml` document.
    pub fn apply_toml(&mut self, content: &str) {
        // Very small hand-rolled parser: look for [interpreter] section and key = value pairs
        let mut in_section = false;
        let mut map: HashMap<String, String> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue; }
            if line.starts_with('[') && line.ends_with(']') {
                in_section = &line[1..line.len()-1] == "interpreter";
                continue;
            }
            if !in_section { continue; }
            if let Some(eq) = line.find('=') {
                let key = line[..eq].trim().to_string();
                let val_raw = line[eq+1..].trim();
                // Accept quoted or unquoted
                let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                    val_raw[1..val_raw.len()-1].to_string()
                } else { val_raw.to_string() };
                map.insert(key, val);
            }
        }

        self.apply(|key| map.get(key).cloned(), [
            "initial_tape_cells",
            "max_tape_cells",
            "strict_loops",
            "max_steps",
            "timeout_ms",
        ]);
    }

    /// Apply `BF_*` environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.apply(lookup, [
            "BF_TAPE_CELLS",
            "BF_MAX_TAPE_CELLS",
            "BF_STRICT",
            "BF_MAX_STEPS",
            "BF_TIMEOUT_MS",
        ]);
    }

    // keys: [initial, max, strict, steps, timeout]
    fn apply<F>(&mut self, lookup: F, keys: [&str; 5])
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = self;
        macro_rules! set {
            ($field:ident, $key:expr, $parse:expr) => {
                if let Some(raw) = lookup($key) {
                    match $parse(raw.trim()) {
                        Some(v) => settings.$field = v,
                        None => log::warn!("ignoring invalid value {:?} for {}", raw, $key),
                    }
                }
            };
        }

        set!(initial_tape_cells, keys[0], parse_count);
        set!(max_tape_cells, keys[1], parse_count);
        set!(strict_loops, keys[2], parse_bool);
        set!(max_steps, keys[3], |s| parse_count(s).map(Some));
        set!(timeout_ms, keys[4], |s| parse_count(s).map(|n| Some(n as u64)));
    }
}

/// Parse a non-negative integer, allowing `_` separators like `30_000`.
fn parse_count(value: &str) -> Option<usize> {
    value.replace('_', "").parse::<usize>().ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os("BF_CONFIG") {
        return Some(PathBuf::from(explicit));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn read_config_file() -> Option<String> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    log::debug!("loaded settings from {}", path.display());
    Some(content)
}
