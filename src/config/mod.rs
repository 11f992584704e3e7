//! Configuration loading.
//!
//! Config is read once at startup from `~/.cla/config.toml` (or an explicit
//! path) and passed by reference to whatever needs it. Every field is optional;
//! missing values fall back to the defaults below.

use crate::keys::{KeyChord, INTERRUPT, NAVIGATION_KEYS};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const BASE_DIR_NAME: &str = ".cla";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_DATA_FILE: &str = "data.json";
const DEFAULT_LIMIT_LINE: usize = 20;
const DEFAULT_FOCUSED_TEXT_COLOR: &str = "205";
const DEFAULT_UNFOCUSED_TEXT_COLOR: &str = "240";
const DEFAULT_EXEC_KEY: &str = "enter";
const DEFAULT_SAVE_KEY: &str = "ctrl+s";
const DEFAULT_DELETE_KEY: &str = "ctrl+d";
const DEFAULT_ADD_KEY: &str = "ctrl+a";
const DEFAULT_QUIT_KEY: &str = "esc";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub limit_line: usize,
    pub colors: ColorConfig,
    pub keys: KeyBindings,
    pub shell: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorConfig {
    pub focused_text: String,
    pub unfocused_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub exec: KeyChord,
    pub save: KeyChord,
    pub delete: KeyChord,
    pub add: KeyChord,
    pub quit: KeyChord,
}

impl KeyBindings {
    /// The bindings paired with the label used in error messages and help.
    pub fn labeled(&self) -> [(&'static str, KeyChord); 5] {
        [
            ("exec", self.exec),
            ("save", self.save),
            ("delete", self.delete),
            ("add", self.add),
            ("quit", self.quit),
        ]
    }

    fn validate(&self) -> Result<()> {
        let labeled = self.labeled();
        for (i, (name, chord)) in labeled.iter().enumerate() {
            if let Some((other, _)) = labeled[i + 1..].iter().find(|(_, c)| c == chord) {
                bail!("keys.{name} and keys.{other} are both bound to {chord}");
            }
            if NAVIGATION_KEYS.contains(chord) {
                bail!("keys.{name} uses {chord}, which is reserved for navigation");
            }
            if *chord == INTERRUPT && *name != "quit" {
                bail!("keys.{name} uses {chord}, which always quits");
            }
            if chord.is_text_input() {
                tracing::warn!(
                    binding = *name,
                    key = %chord,
                    "binding shadows a printable character"
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(alias = "dataFile")]
    data_file: Option<String>,
    #[serde(alias = "limitLine")]
    limit_line: Option<usize>,
    #[serde(alias = "focusedTextColor")]
    focused_text_color: Option<String>,
    #[serde(alias = "unfocusedTextColor")]
    unfocused_text_color: Option<String>,
    shell: Option<String>,
    log_file: Option<String>,
    keys: Option<RawKeys>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKeys {
    #[serde(alias = "execKey")]
    exec: Option<String>,
    #[serde(alias = "saveKey")]
    save: Option<String>,
    #[serde(alias = "delKey", alias = "del")]
    delete: Option<String>,
    #[serde(alias = "addKey")]
    add: Option<String>,
    #[serde(alias = "quitKey")]
    quit: Option<String>,
}

/// `$HOME/.cla`, where both the config and the data file live by default.
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(BASE_DIR_NAME))
}

/// Load the config at `path`, or from the default location when `None`.
/// A missing file yields the defaults; a file that exists but cannot be parsed
/// or validated is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let base = base_dir()?;
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => base.join(CONFIG_FILE_NAME),
    };
    let raw = read_toml(&path)?.unwrap_or_default();
    build_config(raw, &base).with_context(|| format!("invalid config {}", path.display()))
}

/// Parse config text directly; `base` resolves a relative `data_file`.
pub fn parse_config(text: &str, base: &Path) -> Result<Config> {
    let raw: RawConfig = toml::from_str(text).context("parse config")?;
    build_config(raw, base)
}

fn read_toml(path: &Path) -> Result<Option<RawConfig>> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("read config {}", path.display())),
    };
    if contents.trim().is_empty() {
        return Ok(None);
    }
    let raw = toml::from_str::<RawConfig>(&contents)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(Some(raw))
}

fn build_config(raw: RawConfig, base: &Path) -> Result<Config> {
    let keys = raw.keys.unwrap_or_default();
    let keys = KeyBindings {
        exec: parse_key("exec", keys.exec.as_deref(), DEFAULT_EXEC_KEY)?,
        save: parse_key("save", keys.save.as_deref(), DEFAULT_SAVE_KEY)?,
        delete: parse_key("delete", keys.delete.as_deref(), DEFAULT_DELETE_KEY)?,
        add: parse_key("add", keys.add.as_deref(), DEFAULT_ADD_KEY)?,
        quit: parse_key("quit", keys.quit.as_deref(), DEFAULT_QUIT_KEY)?,
    };
    keys.validate()?;

    let limit_line = raw.limit_line.unwrap_or(DEFAULT_LIMIT_LINE);
    if limit_line == 0 {
        bail!("limit_line must be a positive integer");
    }

    let data_file = raw
        .data_file
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
    let data_path = resolve_data_path(base, &data_file)?;

    Ok(Config {
        data_path,
        limit_line,
        colors: ColorConfig {
            focused_text: raw
                .focused_text_color
                .unwrap_or_else(|| DEFAULT_FOCUSED_TEXT_COLOR.to_string()),
            unfocused_text: raw
                .unfocused_text_color
                .unwrap_or_else(|| DEFAULT_UNFOCUSED_TEXT_COLOR.to_string()),
        },
        keys,
        shell: raw.shell.filter(|s| !s.trim().is_empty()),
        log_file: raw.log_file.map(PathBuf::from),
    })
}

fn parse_key(name: &str, value: Option<&str>, default: &str) -> Result<KeyChord> {
    value
        .unwrap_or(default)
        .parse()
        .with_context(|| format!("keys.{name}"))
}

/// The data file is a suffix of the base dir; a leading separator is accepted
/// (`/data.json`) and stripped. Absolute paths elsewhere are not allowed.
fn resolve_data_path(base: &Path, data_file: &str) -> Result<PathBuf> {
    let trimmed = data_file.trim().trim_start_matches(|c: char| c == '/' || c == '\\');
    if trimmed.is_empty() {
        bail!("data_file must name a file");
    }
    let rel = Path::new(trimmed);
    if rel
        .components()
        .any(|c| !matches!(c, std::path::Component::Normal(_)))
    {
        bail!("data_file {data_file:?} must stay inside {}", base.display());
    }
    Ok(base.join(rel))
}
