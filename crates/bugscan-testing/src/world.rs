//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating an isolated working directory
//! - Writing pattern and endpoint sources
//! - Laying out log trees
//! - Executing CLI commands with the workdir wired in

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Default locations, relative to the workdir, that `bugscan` reads and writes.
pub const PATTERN_FILE: &str = "config/error_patterns.txt";
pub const ENDPOINT_FILE: &str = "config/endpoints.txt";
pub const LOG_DIR: &str = "logs";
pub const REPORT_FILE: &str = "output/ssd_issues_report.txt";

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use bugscan_testing::TestWorld;
///
/// let world = TestWorld::new()
///     .with_patterns(&["OutOfMemory"])
///     .with_log("app.log", "ok\nok\nERROR: OutOfMemory killer invoked\n");
///
/// let result = world.run(&["run"]).unwrap();
/// assert_eq!(result.code(), Some(1));
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated workdir. Nothing is written yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            env_vars: HashMap::new(),
        }
    }

    /// The workdir passed to `--workdir`.
    pub fn workdir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.path().join(rel)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.path(LOG_DIR)
    }

    pub fn report_path(&self) -> PathBuf {
        self.path(REPORT_FILE)
    }

    /// Write the default pattern source.
    pub fn with_patterns(self, patterns: &[&str]) -> Self {
        self.with_file(PATTERN_FILE, &lines(patterns))
    }

    /// Write the default endpoint source.
    pub fn with_endpoints<S: AsRef<str>>(self, endpoints: &[S]) -> Self {
        let endpoints: Vec<&str> = endpoints.iter().map(AsRef::as_ref).collect();
        self.with_file(ENDPOINT_FILE, &lines(&endpoints))
    }

    /// Write a log file under the default log directory.
    pub fn with_log(self, rel: &str, contents: &str) -> Self {
        let path = format!("{}/{}", LOG_DIR, rel);
        self.with_file(&path, contents)
    }

    /// Write any file relative to the workdir, creating parents.
    pub fn with_file(self, rel: &str, contents: &str) -> Self {
        self.write_bytes(rel, contents.as_bytes())
            .expect("Failed to write fixture file");
        self
    }

    pub fn write_bytes(&self, rel: &str, contents: &[u8]) -> Result<()> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--workdir").arg(self.workdir());
        cmd.current_dir(self.workdir());

        // Keep diagnostics out of assertions unless a test asks for them.
        cmd.env_remove("RUST_LOG");
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `bugscan` binary in this workdir and capture its output.
    ///
    /// # Note
    /// This method uses `Command::cargo_bin()` which requires the binary to be
    /// built, which cargo does for integration tests of the owning package.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("bugscan")
            .map_err(|e| anyhow::anyhow!("Failed to find bugscan binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

fn lines(entries: &[&str]) -> String {
    let mut out = entries.join("\n");
    out.push('\n');
    out
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
