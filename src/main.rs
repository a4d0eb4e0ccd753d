//! claude-pager - Entry Point

use claude_pager::config::{resolve_config, CliOverrides};
use claude_pager::model::AppError;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Live transcript pager shown while an external editor is open
#[derive(Parser, Debug)]
#[command(name = "claude-pager")]
#[command(version)]
#[command(about = "Scrollable live view of a Claude Code JSONL transcript")]
pub struct Args {
    /// Path to the JSONL transcript
    pub transcript: Option<PathBuf>,

    /// Exit when this process exits
    pub editor_pid: Option<u32>,

    /// Context window size in tokens (must be positive)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub ctx_limit: Option<u64>,

    /// Write debug logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable syntax highlighting of code blocks
    #[arg(long)]
    pub no_highlight: bool,

    /// Color theme for syntax highlighting
    #[arg(long)]
    pub theme: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            ctx_limit: self.ctx_limit,
            theme: self.theme.clone(),
            log_file: self.log_file.clone(),
            no_highlight: self.no_highlight,
        }
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = resolve_config(args.config.clone(), args.overrides())?;

    claude_pager::logging::init_optional(config.log_file_path.as_deref())?;

    info!(config = ?config, "Configuration loaded and resolved");

    claude_pager::view::run(&config, args.transcript, args.editor_pid)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["claude-pager", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["claude-pager", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["claude-pager"]);
        assert_eq!(args.transcript, None);
        assert_eq!(args.editor_pid, None);
        assert_eq!(args.ctx_limit, None);
        assert_eq!(args.log_file, None);
        assert_eq!(args.config, None);
        assert!(!args.no_highlight);
        assert_eq!(args.theme, None);
    }

    #[test]
    fn test_positionals_populate_transcript_and_pid() {
        let args = Args::parse_from(["claude-pager", "/tmp/t.jsonl", "4242"]);
        assert_eq!(args.transcript, Some(PathBuf::from("/tmp/t.jsonl")));
        assert_eq!(args.editor_pid, Some(4242));
    }

    #[test]
    fn test_non_numeric_pid_is_rejected() {
        let result = Args::try_parse_from(["claude-pager", "/tmp/t.jsonl", "vim"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ctx_limit_must_be_positive() {
        assert!(Args::try_parse_from(["claude-pager", "--ctx-limit", "0"]).is_err());
        let args = Args::parse_from(["claude-pager", "--ctx-limit", "1000000"]);
        assert_eq!(args.ctx_limit, Some(1_000_000));
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let args = Args::parse_from([
            "claude-pager",
            "--no-highlight",
            "--theme",
            "nord",
            "--log-file",
            "/tmp/pager.log",
        ]);
        let overrides = args.overrides();
        assert!(overrides.no_highlight);
        assert_eq!(overrides.theme.as_deref(), Some("nord"));
        assert_eq!(overrides.log_file, Some(PathBuf::from("/tmp/pager.log")));
        assert_eq!(overrides.ctx_limit, None);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["claude-pager", "--follow"]).is_err());
    }
}
