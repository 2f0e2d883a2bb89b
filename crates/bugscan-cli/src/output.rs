//! Console and JSON rendering of command results.
//!
//! Plain output goes to stdout line by line as the run progresses. JSON output
//! is a single document printed at the end, so progress is suppressed.

use crate::types::OutputFormat;
use anyhow::Result;
use bugscan_engine::{ProbeOutcome, ScanOutcome};
use bugscan_runtime::{PatternInspection, RunConfig, RunObserver, RunOutcome, RunState};
use bugscan_types::{Diagnostic, EndpointIssue, Issue, LogIssue, RunVerdict};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Prints a progress line as each phase starts and for every diagnostic
pub struct ConsoleObserver {
    log_dir: String,
    endpoint_file: String,
}

impl ConsoleObserver {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            log_dir: config.log_dir.display().to_string(),
            endpoint_file: config.endpoint_file.display().to_string(),
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn on_state(&self, state: RunState) {
        match state {
            RunState::LoadingConfig => println!("Starting bug scan..."),
            RunState::Scanning => println!("Checking backend logs in {}...", self.log_dir),
            RunState::Probing => println!("Checking endpoints from {}...", self.endpoint_file),
            _ => {}
        }
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        println!("Warning: {}", diagnostic);
    }
}

#[derive(Serialize)]
struct RunView<'a> {
    verdict: RunVerdict,
    issues: &'a [Issue],
    diagnostics: &'a [Diagnostic],
    saved_to: Option<&'a str>,
    files_scanned: usize,
    endpoints_checked: usize,
    cancelled: bool,
}

#[derive(Serialize)]
struct LogsView<'a> {
    issues: &'a [LogIssue],
    diagnostics: &'a [Diagnostic],
    files_scanned: usize,
    cancelled: bool,
}

#[derive(Serialize)]
struct EndpointsView<'a> {
    issues: &'a [EndpointIssue],
    diagnostics: &'a [Diagnostic],
    checked: usize,
    skipped: usize,
}

#[derive(Serialize)]
struct RejectedView<'a> {
    pattern: &'a str,
    reason: &'a str,
}

#[derive(Serialize)]
struct PatternsView<'a> {
    loaded: bool,
    accepted: Vec<&'a str>,
    rejected: Vec<RejectedView<'a>>,
    diagnostics: &'a [Diagnostic],
}

/// Renders command results in the selected format
pub struct Renderer {
    format: OutputFormat,
    color: bool,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: std::io::stdout().is_terminal(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn print_json<T: Serialize>(&self, view: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(view)?);
        Ok(())
    }

    fn print_count(&self, count: usize) {
        let line = if count == 0 {
            "No issues found.".to_string()
        } else {
            format!("Found {} issues.", count)
        };
        if !self.color {
            println!("{}", line);
        } else if count == 0 {
            println!("{}", line.green());
        } else {
            println!("{}", line.red().bold());
        }
    }

    fn print_issues<T: std::fmt::Display>(&self, issues: &[T]) {
        for issue in issues {
            println!("{}", issue);
        }
    }

    fn print_cancelled(&self) {
        if self.color {
            println!("{}", "Stopped early; results are partial.".yellow());
        } else {
            println!("Stopped early; results are partial.");
        }
    }

    pub fn render_run(&self, outcome: &RunOutcome) -> Result<()> {
        if self.is_json() {
            return self.print_json(&RunView {
                verdict: outcome.verdict,
                issues: outcome.report.issues(),
                diagnostics: &outcome.diagnostics,
                saved_to: outcome.saved_to.as_deref(),
                files_scanned: outcome.files_scanned,
                endpoints_checked: outcome.endpoints_checked,
                cancelled: outcome.cancelled,
            });
        }

        if outcome.cancelled {
            self.print_cancelled();
        }

        if outcome.verdict == RunVerdict::CouldNotRun {
            println!("Could not run: neither the pattern source nor the endpoint source could be loaded.");
            return Ok(());
        }

        self.print_count(outcome.report.len());
        self.print_issues(outcome.report.issues());
        if let Some(path) = &outcome.saved_to {
            println!("Results saved to: {}", path);
        }
        Ok(())
    }

    pub fn render_logs(&self, outcome: &ScanOutcome) -> Result<()> {
        if self.is_json() {
            return self.print_json(&LogsView {
                issues: &outcome.issues,
                diagnostics: &outcome.diagnostics,
                files_scanned: outcome.files_scanned,
                cancelled: outcome.cancelled,
            });
        }

        if outcome.cancelled {
            self.print_cancelled();
        }
        println!("Scanned {} log files.", outcome.files_scanned);
        self.print_count(outcome.issues.len());
        self.print_issues(&outcome.issues);
        Ok(())
    }

    pub fn render_endpoints(
        &self,
        outcome: &ProbeOutcome,
        diagnostics: &[Diagnostic],
    ) -> Result<()> {
        if self.is_json() {
            return self.print_json(&EndpointsView {
                issues: &outcome.issues,
                diagnostics,
                checked: outcome.checked,
                skipped: outcome.skipped,
            });
        }

        if outcome.skipped > 0 {
            self.print_cancelled();
        }
        println!("Checked {} endpoints.", outcome.checked);
        self.print_count(outcome.issues.len());
        self.print_issues(&outcome.issues);
        Ok(())
    }

    pub fn render_patterns(&self, inspection: &PatternInspection) -> Result<()> {
        let patterns = &inspection.patterns;
        if self.is_json() {
            return self.print_json(&PatternsView {
                loaded: inspection.loaded,
                accepted: patterns.patterns().iter().map(|p| p.as_str()).collect(),
                rejected: patterns
                    .rejected()
                    .iter()
                    .map(|r| RejectedView {
                        pattern: &r.source,
                        reason: &r.reason,
                    })
                    .collect(),
                diagnostics: &inspection.diagnostics,
            });
        }

        if !inspection.loaded {
            println!("Pattern source could not be loaded.");
            return Ok(());
        }

        println!("{} patterns accepted:", patterns.len());
        for pattern in patterns.patterns() {
            println!("  {}", pattern.as_str());
        }
        if !patterns.rejected().is_empty() {
            println!("{} patterns rejected:", patterns.rejected().len());
            for rejected in patterns.rejected() {
                println!("  {}: {}", rejected.source, rejected.reason);
            }
        }
        Ok(())
    }
}
