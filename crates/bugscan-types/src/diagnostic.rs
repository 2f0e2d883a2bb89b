use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a non-fatal problem met during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Pattern or endpoint source could not be read
    ConfigLoad,
    /// A pattern line was not a valid expression
    Pattern,
    /// A directory entry under the log root could not be listed
    Walk,
    /// A log file could not be opened or read
    FileRead,
    /// The log root does not exist
    MissingRoot,
    /// The report file could not be written
    SinkWrite,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::ConfigLoad => "config_load",
            DiagnosticKind::Pattern => "pattern",
            DiagnosticKind::Walk => "walk",
            DiagnosticKind::FileRead => "file_read",
            DiagnosticKind::MissingRoot => "missing_root",
            DiagnosticKind::SinkWrite => "sink_write",
        };
        f.write_str(label)
    }
}

/// A problem that was skipped rather than allowed to abort the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// What the problem is about: a path, a pattern, a URL
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}
