//! Configuration loading and discovery

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;

const PROJECT_CONFIG: &str = "autolot.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The unknown or problematic key
    pub key: String,
    pub file: PathBuf,
    /// The line number (1-indexed) if available
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Explicit path, then `./autolot.toml`, then the user config, then defaults.
pub fn discover(explicit: Option<&Path>) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let (config, warnings) = load_with_warnings(path)?;
        return Ok((with_env_overrides(config), warnings));
    }

    let candidates = std::iter::once(PathBuf::from(PROJECT_CONFIG))
        .chain(dirs::config_dir().map(|dir| dir.join("autolot").join("config.toml")));
    for candidate in candidates {
        if candidate.exists() {
            debug!(path = %candidate.display(), "loading config");
            let (config, warnings) = load_with_warnings(&candidate)?;
            return Ok((with_env_overrides(config), warnings));
        }
    }

    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// Apply environment variable overrides (AUTOLOT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env(config, |name| std::env::var(name).ok())
}

/// Apply overrides from `lookup`; unparseable values are ignored.
pub fn apply_env(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(backend) = lookup("AUTOLOT_STORE_BACKEND").and_then(|v| v.parse().ok()) {
        config.store.backend = backend;
    }

    if let Some(dir) = lookup("AUTOLOT_DATA_DIR").filter(|v| !v.trim().is_empty()) {
        config.store.data_dir = PathBuf::from(dir);
    }

    if let Some(val) = lookup("AUTOLOT_STRICT_NAMES") {
        config.validation.strict_names = val.to_lowercase() != "false" && val != "0";
    }

    if let Some(format) = lookup("AUTOLOT_OUTPUT").and_then(|v| v.parse().ok()) {
        config.output.format = Some(format);
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "store",
        "backend",
        "data_dir",
        "validation",
        "strict_names",
        "output",
        "format",
        "log",
        "level",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ac) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod unit {
    use super::*;

    #[test]
    fn levenshtein_counts_edits() {
        assert_eq!(levenshtein("level", "level"), 0);
        assert_eq!(levenshtein("levle", "level"), 2);
        assert_eq!(levenshtein("backnd", "backend"), 1);
    }

    #[test]
    fn suggest_key_only_for_close_matches() {
        assert_eq!(suggest_key("strict_name").as_deref(), Some("strict_names"));
        assert_eq!(suggest_key("completely_unrelated"), None);
    }
}
