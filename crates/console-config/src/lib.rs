//! Configuration loading and parsing.
//!
//! Parses `console.toml` (or an override path provided by the binary). Every
//! field is optional; unknown fields are ignored so the file can grow without
//! breaking older builds. The raw parsed values are kept in [`ConfigFile`] and
//! validated into a [`ConsoleSettings`] by [`Config::settings`], which falls
//! back to defaults (and says so in the log) for values the console cannot use.

use anyhow::Result;
use serde::Deserialize;
use std::{collections::HashSet, fs, path::PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PROMPT_MARKER: &str = "$ ";
pub const DEFAULT_TERMINATORS: [char; 2] = ['\n', '\r'];
pub const DEFAULT_HISTORY_MAX: usize = 100;

#[derive(Debug, Deserialize, Clone)]
pub struct PromptConfig {
    #[serde(default = "PromptConfig::default_marker")]
    pub marker: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            marker: Self::default_marker(),
        }
    }
}

impl PromptConfig {
    fn default_marker() -> String {
        DEFAULT_PROMPT_MARKER.to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_terminators")]
    pub terminators: Vec<char>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            terminators: Self::default_terminators(),
        }
    }
}

impl InputConfig {
    fn default_terminators() -> Vec<char> {
        DEFAULT_TERMINATORS.to_vec()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: Self::default_max_entries(),
        }
    }
}

impl HistoryConfig {
    const fn default_max_entries() -> usize {
        DEFAULT_HISTORY_MAX
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Validated settings consumed by the console document.
///
/// Fields are private so every instance goes through [`ConsoleSettings::new`]:
/// the marker is never empty and never contains a terminator, and the
/// terminator list is non-empty without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSettings {
    prompt_marker: String,
    terminators: Vec<char>,
    history_max: usize,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            prompt_marker: DEFAULT_PROMPT_MARKER.to_string(),
            terminators: DEFAULT_TERMINATORS.to_vec(),
            history_max: DEFAULT_HISTORY_MAX,
        }
    }
}

impl ConsoleSettings {
    /// Validate raw values, falling back to defaults (logged under `config`)
    /// for anything the console cannot use. `history_max` of 0 disables recall.
    pub fn new(
        prompt_marker: impl Into<String>,
        terminators: impl IntoIterator<Item = char>,
        history_max: usize,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut terminators: Vec<char> = terminators
            .into_iter()
            .filter(|c| seen.insert(*c))
            .collect();
        if terminators.is_empty() {
            info!(target: "config", "terminators_empty_using_default");
            terminators = DEFAULT_TERMINATORS.to_vec();
        }

        let raw_marker = prompt_marker.into();
        let prompt_marker = if raw_marker.is_empty() {
            info!(target: "config", "prompt_marker_empty_using_default");
            DEFAULT_PROMPT_MARKER.to_string()
        } else if raw_marker.chars().any(|c| terminators.contains(&c)) {
            info!(target: "config", marker_len = raw_marker.chars().count(), "prompt_marker_has_terminator_using_default");
            DEFAULT_PROMPT_MARKER.to_string()
        } else {
            raw_marker
        };

        Self {
            prompt_marker,
            terminators,
            history_max,
        }
    }

    /// Literal prompt marker.
    pub fn prompt_marker(&self) -> &str {
        &self.prompt_marker
    }

    /// Characters that end a command line when typed or pasted.
    pub fn terminators(&self) -> &[char] {
        &self.terminators
    }

    pub fn history_max(&self) -> usize {
        self.history_max
    }

    pub fn is_terminator(&self, c: char) -> bool {
        self.terminators.contains(&c)
    }

    /// Char length of the prompt marker.
    pub fn marker_len(&self) -> usize {
        self.prompt_marker.chars().count()
    }
}

/// Best-effort config path: local working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("console.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("scriptconsole").join("console.toml");
    }
    PathBuf::from("console.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Ok(Config {
                raw: Some(content),
                file,
            }),
            Err(e) => {
                // Parse errors fall back to defaults; the console stays usable.
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

impl Config {
    /// Validate the parsed file into settings the console can rely on.
    pub fn settings(&self) -> ConsoleSettings {
        ConsoleSettings::new(
            self.file.prompt.marker.clone(),
            self.file.input.terminators.iter().copied(),
            self.file.history.max_entries,
        )
    }
}
