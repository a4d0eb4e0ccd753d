//! Configuration file loading with precedence handling.

use crate::model::DEFAULT_CTX_LIMIT;
use crate::pager::geometry::DEFAULT_MAX_COLUMNS;
use crate::render::highlighter::{is_valid_theme, DEFAULT_THEME, VALID_THEMES};
use crate::render::{DEFAULT_HUMAN_MAX_LINES, DEFAULT_RESULT_MAX_LINES};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "CLAUDE_PAGER_CONFIG";
/// Environment variable overriding the context limit.
pub const ENV_CTX_LIMIT: &str = "CLAUDE_PAGER_CTX_LIMIT";
/// Environment variable overriding the highlight theme.
pub const ENV_THEME: &str = "CLAUDE_PAGER_THEME";
/// Environment variable naming the debug log file.
pub const ENV_LOG: &str = "CLAUDE_PAGER_LOG";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting is syntactically valid but out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/claude-pager/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Context window size used for the usage percentage.
    #[serde(default)]
    pub ctx_limit: Option<u64>,

    /// Maximum number of terminal columns used for layout.
    #[serde(default)]
    pub max_columns: Option<usize>,

    /// Human-turn lines shown before truncation.
    #[serde(default)]
    pub human_max_lines: Option<usize>,

    /// Tool-result lines shown before truncation.
    #[serde(default)]
    pub result_max_lines: Option<usize>,

    /// Syntax highlighting of fenced code blocks.
    #[serde(default)]
    pub syntax_highlight: Option<bool>,

    /// Highlight theme name (e.g., "monokai", "gruvbox-dark").
    #[serde(default)]
    pub theme: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Context window size.
    pub ctx_limit: u64,
    /// Column cap.
    pub max_columns: usize,
    /// Human-turn truncation.
    pub human_max_lines: usize,
    /// Tool-result truncation.
    pub result_max_lines: usize,
    /// Syntax highlighting enabled.
    pub syntax_highlight: bool,
    /// Theme name.
    pub theme: String,
    /// Debug log file; no logging when `None`.
    pub log_file_path: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            ctx_limit: DEFAULT_CTX_LIMIT,
            max_columns: DEFAULT_MAX_COLUMNS,
            human_max_lines: DEFAULT_HUMAN_MAX_LINES,
            result_max_lines: DEFAULT_RESULT_MAX_LINES,
            syntax_highlight: true,
            theme: DEFAULT_THEME.to_string(),
            log_file_path: None,
        }
    }
}

impl ResolvedConfig {
    /// Reject values the pager cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ctx_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ctx_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_columns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_columns",
                reason: "must be at least 1".to_string(),
            });
        }
        if !is_valid_theme(&self.theme) {
            return Err(ConfigError::InvalidValue {
                field: "theme",
                reason: format!(
                    "unknown theme '{}', expected one of: {}",
                    self.theme,
                    VALID_THEMES.join(", ")
                ),
            });
        }
        Ok(())
    }
}

/// Overrides taken from command-line flags; `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--ctx-limit`
    pub ctx_limit: Option<u64>,
    /// `--theme`
    pub theme: Option<String>,
    /// `--log-file`
    pub log_file: Option<PathBuf>,
    /// `--no-highlight`
    pub no_highlight: bool,
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path, `~/.config/claude-pager/config.toml` on Unix.
///
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("claude-pager").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CLAUDE_PAGER_CONFIG` environment variable
/// 3. Default path `~/.config/claude-pager/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        ctx_limit: config.ctx_limit.unwrap_or(defaults.ctx_limit),
        max_columns: config.max_columns.unwrap_or(defaults.max_columns),
        human_max_lines: config.human_max_lines.unwrap_or(defaults.human_max_lines),
        result_max_lines: config.result_max_lines.unwrap_or(defaults.result_max_lines),
        syntax_highlight: config.syntax_highlight.unwrap_or(defaults.syntax_highlight),
        theme: config.theme.unwrap_or(defaults.theme),
        log_file_path: config.log_file_path.or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `CLAUDE_PAGER_CTX_LIMIT`, `CLAUDE_PAGER_THEME` and
/// `CLAUDE_PAGER_LOG`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when the context limit is not a
/// positive integer.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(ENV_CTX_LIMIT) {
        match raw.trim().parse::<u64>() {
            Ok(limit) if limit > 0 => config.ctx_limit = limit,
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: ENV_CTX_LIMIT,
                    reason: format!("'{raw}' is not a positive integer"),
                })
            }
        }
    }

    if let Ok(theme) = std::env::var(ENV_THEME) {
        config.theme = theme;
    }

    if let Some(path) = std::env::var_os(ENV_LOG).filter(|p| !p.is_empty()) {
        config.log_file_path = Some(PathBuf::from(path));
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(limit) = cli.ctx_limit {
        config.ctx_limit = limit;
    }

    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    if let Some(path) = cli.log_file {
        config.log_file_path = Some(path);
    }

    if cli.no_highlight {
        config.syntax_highlight = false;
    }

    config
}

/// Run the whole precedence chain and validate the result.
///
/// # Errors
///
/// Returns error if a config file exists but is unreadable or invalid, an
/// environment override is malformed, or a resolved value is out of range.
pub fn resolve_config(
    config_path: Option<PathBuf>,
    cli: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_cli_overrides(apply_env_overrides(merge_config(file))?, cli);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
