use crate::{Error, Result};
use bugscan_engine::{DEFAULT_CONCURRENCY, DEFAULT_LOG_SUFFIX, DEFAULT_TIMEOUT, ProbeSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PATTERN_FILE: &str = "config/error_patterns.txt";
pub const DEFAULT_ENDPOINT_FILE: &str = "config/endpoints.txt";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_OUTPUT_FILE: &str = "output/ssd_issues_report.txt";

/// Resolve the working directory that relative paths are anchored to:
/// 1. Explicit path (with tilde expansion)
/// 2. BUGSCAN_WORKDIR environment variable (with tilde expansion)
/// 3. Current directory
///
/// The directory must exist; a run cannot write its report otherwise.
pub fn resolve_workdir(explicit_path: Option<&str>) -> Result<PathBuf> {
    let path = if let Some(path) = explicit_path {
        expand_tilde(path)
    } else if let Ok(env_path) = std::env::var("BUGSCAN_WORKDIR") {
        expand_tilde(&env_path)
    } else {
        std::env::current_dir().map_err(|err| Error::Workdir(err.to_string()))?
    };

    if !path.is_dir() {
        return Err(Error::Workdir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(path)
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

/// On-disk configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub patterns: Option<PathBuf>,
    #[serde(default)]
    pub endpoints: Option<PathBuf>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub log_suffix: Option<String>,
    #[serde(default)]
    pub probe: ProbeSection,
    #[serde(default)]
    pub run: RunSection,
}

/// Values given on the command line; they win over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub patterns: Option<PathBuf>,
    pub endpoints: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
    pub deadline_secs: Option<u64>,
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?;
        Ok(config)
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if overrides.patterns.is_some() {
            self.patterns = overrides.patterns;
        }
        if overrides.endpoints.is_some() {
            self.endpoints = overrides.endpoints;
        }
        if overrides.log_dir.is_some() {
            self.log_dir = overrides.log_dir;
        }
        if overrides.output.is_some() {
            self.output = overrides.output;
        }
        if overrides.timeout_secs.is_some() {
            self.probe.timeout_secs = overrides.timeout_secs;
        }
        if overrides.concurrency.is_some() {
            self.probe.concurrency = overrides.concurrency;
        }
        if overrides.deadline_secs.is_some() {
            self.run.deadline_secs = overrides.deadline_secs;
        }
        self
    }

    /// Fill in defaults and anchor relative paths at `workdir`
    pub fn resolve(&self, workdir: &Path) -> Result<RunConfig> {
        let anchor = |value: &Option<PathBuf>, default: &str| {
            let path = value.clone().unwrap_or_else(|| PathBuf::from(default));
            if path.is_absolute() {
                path
            } else {
                workdir.join(path)
            }
        };

        let concurrency = self.probe.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(Error::Config(
                "probe concurrency must be at least 1".to_string(),
            ));
        }

        let timeout = self
            .probe
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::Config(
                "probe timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(RunConfig {
            pattern_file: anchor(&self.patterns, DEFAULT_PATTERN_FILE),
            endpoint_file: anchor(&self.endpoints, DEFAULT_ENDPOINT_FILE),
            log_dir: anchor(&self.log_dir, DEFAULT_LOG_DIR),
            output: anchor(&self.output, DEFAULT_OUTPUT_FILE),
            log_suffix: self
                .log_suffix
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_SUFFIX.to_string()),
            probe: ProbeSettings {
                timeout,
                concurrency,
            },
            deadline: self.run.deadline_secs.map(Duration::from_secs),
        })
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub pattern_file: PathBuf,
    pub endpoint_file: PathBuf,
    pub log_dir: PathBuf,
    pub output: PathBuf,
    pub log_suffix: String,
    pub probe: ProbeSettings,
    pub deadline: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_anchored_at_workdir() {
        let config = Config::default().resolve(Path::new("/srv/scan")).unwrap();

        assert_eq!(
            config.pattern_file,
            PathBuf::from("/srv/scan/config/error_patterns.txt")
        );
        assert_eq!(
            config.endpoint_file,
            PathBuf::from("/srv/scan/config/endpoints.txt")
        );
        assert_eq!(config.log_dir, PathBuf::from("/srv/scan/logs"));
        assert_eq!(
            config.output,
            PathBuf::from("/srv/scan/output/ssd_issues_report.txt")
        );
        assert_eq!(config.log_suffix, ".log");
        assert_eq!(config.probe.timeout, Duration::from_secs(5));
        assert_eq!(config.deadline, None);
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("bugscan.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_from_toml() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("bugscan.toml");
        std::fs::write(
            &path,
            r#"
log_dir = "/var/log/opsmx"
output = "reports/today.txt"

[probe]
timeout_secs = 2
concurrency = 3

[run]
deadline_secs = 30
"#,
        )?;

        let resolved = Config::load_from(&path)?.resolve(Path::new("/work"))?;
        assert_eq!(resolved.log_dir, PathBuf::from("/var/log/opsmx"));
        assert_eq!(resolved.output, PathBuf::from("/work/reports/today.txt"));
        assert_eq!(resolved.probe.timeout, Duration::from_secs(2));
        assert_eq!(resolved.probe.concurrency, 3);
        assert_eq!(resolved.deadline, Some(Duration::from_secs(30)));
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_config_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("bugscan.toml");
        std::fs::write(&path, "log_directory = \"logs\"\n")?;

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        Ok(())
    }

    #[test]
    fn test_overrides_win_over_file_values() -> Result<()> {
        let config = Config {
            log_dir: Some(PathBuf::from("from-file")),
            probe: ProbeSection {
                timeout_secs: Some(9),
                concurrency: None,
            },
            ..Config::default()
        };

        let resolved = config
            .apply(ConfigOverrides {
                log_dir: Some(PathBuf::from("from-cli")),
                concurrency: Some(2),
                ..ConfigOverrides::default()
            })
            .resolve(Path::new("/w"))?;

        assert_eq!(resolved.log_dir, PathBuf::from("/w/from-cli"));
        assert_eq!(resolved.probe.timeout, Duration::from_secs(9));
        assert_eq!(resolved.probe.concurrency, 2);
        Ok(())
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = Config::default().apply(ConfigOverrides {
            concurrency: Some(0),
            ..ConfigOverrides::default()
        });
        assert!(matches!(
            config.resolve(Path::new("/w")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_resolve_workdir_requires_directory() {
        let temp_dir = TempDir::new().unwrap();
        let explicit = temp_dir.path().to_str().unwrap();
        assert_eq!(
            resolve_workdir(Some(explicit)).unwrap(),
            temp_dir.path().to_path_buf()
        );

        let missing = temp_dir.path().join("gone");
        let err = resolve_workdir(Some(missing.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, Error::Workdir(_)));
    }
}
