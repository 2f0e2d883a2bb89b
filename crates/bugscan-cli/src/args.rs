use crate::types::{LogLevel, OutputFormat};
use bugscan_runtime::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bugscan")]
#[command(
    about = "Scan log trees for error patterns and probe service endpoints",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file (missing file means defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory that relative paths are resolved against
    #[arg(long, global = true)]
    pub workdir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Scan logs, probe endpoints and write the report (default)")]
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    #[command(about = "Scan the log tree only and print matching lines")]
    Logs {
        #[command(flatten)]
        args: LogsArgs,
    },

    #[command(about = "Probe the endpoint list only and print failures")]
    Endpoints {
        #[command(flatten)]
        args: EndpointsArgs,
    },

    #[command(about = "Compile the pattern source and list accepted and rejected patterns")]
    Patterns {
        #[command(flatten)]
        args: PatternsArgs,
    },
}

impl Commands {
    /// Command-line values that win over the config file
    pub fn overrides(&self) -> ConfigOverrides {
        match self {
            Commands::Run { args } => args.into(),
            Commands::Logs { args } => args.into(),
            Commands::Endpoints { args } => args.into(),
            Commands::Patterns { args } => args.into(),
        }
    }
}

/// Overrides for the full pipeline
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub logs: LogsArgs,

    /// Endpoint source, one URL per line
    #[arg(long)]
    pub endpoints: Option<PathBuf>,

    /// Per-request probe timeout
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of probes in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Report file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LogsArgs {
    #[command(flatten)]
    pub patterns: PatternsArgs,

    /// Root of the log tree
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Stop after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EndpointsArgs {
    /// Endpoint source, one URL per line
    #[arg(long)]
    pub endpoints: Option<PathBuf>,

    /// Per-request probe timeout
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of probes in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Stop after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PatternsArgs {
    /// Pattern source, one pattern per line
    #[arg(long)]
    pub patterns: Option<PathBuf>,
}

impl From<&PatternsArgs> for ConfigOverrides {
    fn from(args: &PatternsArgs) -> Self {
        ConfigOverrides {
            patterns: args.patterns.clone(),
            ..ConfigOverrides::default()
        }
    }
}

impl From<&LogsArgs> for ConfigOverrides {
    fn from(args: &LogsArgs) -> Self {
        ConfigOverrides {
            log_dir: args.log_dir.clone(),
            deadline_secs: args.deadline_secs,
            ..ConfigOverrides::from(&args.patterns)
        }
    }
}

impl From<&EndpointsArgs> for ConfigOverrides {
    fn from(args: &EndpointsArgs) -> Self {
        ConfigOverrides {
            endpoints: args.endpoints.clone(),
            timeout_secs: args.timeout_secs,
            concurrency: args.concurrency,
            deadline_secs: args.deadline_secs,
            ..ConfigOverrides::default()
        }
    }
}

impl From<&RunArgs> for ConfigOverrides {
    fn from(args: &RunArgs) -> Self {
        ConfigOverrides {
            endpoints: args.endpoints.clone(),
            output: args.output.clone(),
            timeout_secs: args.timeout_secs,
            concurrency: args.concurrency,
            ..ConfigOverrides::from(&args.logs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["bugscan"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Plain);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bugscan",
            "logs",
            "--format",
            "json",
            "--log-dir",
            "/var/log/app",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        let overrides = cli.command.as_ref().unwrap().overrides();
        assert_eq!(overrides.log_dir, Some(PathBuf::from("/var/log/app")));
    }

    #[test]
    fn test_overrides_carry_every_flag() {
        let cli = Cli::try_parse_from([
            "bugscan",
            "run",
            "--timeout-secs",
            "2",
            "--concurrency",
            "4",
            "--deadline-secs",
            "30",
            "--patterns",
            "p.txt",
        ])
        .unwrap();
        let overrides = cli.command.as_ref().unwrap().overrides();
        assert_eq!(overrides.timeout_secs, Some(2));
        assert_eq!(overrides.concurrency, Some(4));
        assert_eq!(overrides.deadline_secs, Some(30));
        assert_eq!(overrides.patterns, Some(PathBuf::from("p.txt")));
        assert!(overrides.output.is_none());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["bugscan", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_subcommands_reject_flags_they_do_not_use() {
        assert!(Cli::try_parse_from(["bugscan", "patterns", "--timeout-secs", "3"]).is_err());
        assert!(Cli::try_parse_from(["bugscan", "patterns", "--endpoints", "x"]).is_err());
        assert!(Cli::try_parse_from(["bugscan", "logs", "--endpoints", "x"]).is_err());
        assert!(Cli::try_parse_from(["bugscan", "logs", "--output", "r.txt"]).is_err());
        assert!(Cli::try_parse_from(["bugscan", "endpoints", "--log-dir", "logs"]).is_err());
        assert!(Cli::try_parse_from(["bugscan", "endpoints", "--patterns", "p"]).is_err());

        let cli = Cli::try_parse_from(["bugscan", "patterns", "--patterns", "p.txt"]).unwrap();
        let overrides = cli.command.as_ref().unwrap().overrides();
        assert_eq!(overrides.patterns, Some(PathBuf::from("p.txt")));
        assert!(overrides.timeout_secs.is_none());
    }
}
