use crate::{CancelToken, Error, PatternSet, Result};
use bugscan_types::{Diagnostic, DiagnosticKind, LogIssue};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

pub const DEFAULT_LOG_SUFFIX: &str = ".log";

/// One line of a log file while it is being checked
#[derive(Debug, Clone, Copy)]
pub struct LogLine<'a> {
    pub file: &'a str,
    /// 1-based
    pub number: usize,
    pub text: &'a str,
}

impl LogLine<'_> {
    pub fn to_issue(&self) -> LogIssue {
        LogIssue::new(self.file, self.number, self.text)
    }
}

/// Result of scanning one log tree
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Matching lines, in traversal order then ascending line number
    pub issues: Vec<LogIssue>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
    /// True when the scan stopped early on cancellation
    pub cancelled: bool,
}

/// Walks a directory tree and reports every log line matching a [`PatternSet`]
#[derive(Debug, Clone)]
pub struct LogScanner {
    suffix: String,
    cancel: Option<CancelToken>,
}

impl Default for LogScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LogScanner {
    pub fn new() -> Self {
        Self {
            suffix: DEFAULT_LOG_SUFFIX.to_string(),
            cancel: None,
        }
    }

    /// Only files whose name ends with `suffix` are scanned
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    fn is_log_file(&self, name: &str) -> bool {
        name.ends_with(&self.suffix)
    }

    pub fn scan(&self, root: &Path, patterns: &PatternSet) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        if !root.is_dir() {
            let message = if root.exists() {
                "not a directory"
            } else {
                "log directory does not exist"
            };
            tracing::debug!(root = %root.display(), "{}", message);
            outcome.diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingRoot,
                root.display().to_string(),
                message,
            ));
            return outcome;
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            if self.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let subject = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    tracing::debug!(path = %subject, error = %err, "skipping unreadable entry");
                    outcome
                        .diagnostics
                        .push(Diagnostic::new(DiagnosticKind::Walk, subject, err));
                    continue;
                }
            };

            // Symlinked files count; symlinked directories are not followed.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !self.is_log_file(&file_name) {
                continue;
            }

            tracing::debug!(path = %entry.path().display(), "scanning log file");
            outcome.files_scanned += 1;

            if let Err(err) =
                self.scan_file(entry.path(), &file_name, patterns, &mut outcome.issues)
            {
                tracing::debug!(error = %err, "skipping unreadable log file");
                outcome.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::FileRead,
                    entry.path().display().to_string(),
                    err,
                ));
            }
        }

        if self.is_cancelled() {
            outcome.cancelled = true;
        }

        tracing::info!(
            files = outcome.files_scanned,
            issues = outcome.issues.len(),
            "log scan finished"
        );
        outcome
    }

    /// Check every line of one file.
    ///
    /// Issues found before a read error are kept.
    fn scan_file(
        &self,
        path: &Path,
        file_name: &str,
        patterns: &PatternSet,
        issues: &mut Vec<LogIssue>,
    ) -> Result<()> {
        let read_error = |source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(read_error)?;
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut number = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(read_error)? == 0 {
                break;
            }
            number += 1;

            if self.is_cancelled() {
                break;
            }

            let text = String::from_utf8_lossy(&buf);
            let line = LogLine {
                file: file_name,
                number,
                text: &text,
            };
            if patterns.matches_any(line.text) {
                issues.push(line.to_issue());
            }
        }

        Ok(())
    }
}

/// Scan `root` with default settings
pub fn scan(root: &Path, patterns: &PatternSet) -> ScanOutcome {
    LogScanner::new().scan(root, patterns)
}
