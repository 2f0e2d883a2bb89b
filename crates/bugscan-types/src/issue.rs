use serde::{Deserialize, Serialize};
use std::fmt;

/// A log line that matched at least one error pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogIssue {
    /// Base name of the log file (no directory components)
    pub file: String,

    /// 1-based line number within the file
    pub line_number: usize,

    /// Line text with surrounding whitespace trimmed
    pub text: String,
}

impl LogIssue {
    pub fn new(file: impl Into<String>, line_number: usize, text: impl AsRef<str>) -> Self {
        Self {
            file: file.into(),
            line_number,
            text: text.as_ref().trim().to_string(),
        }
    }
}

impl fmt::Display for LogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} | Line {}]: {}", self.file, self.line_number, self.text)
    }
}

/// Why an endpoint was reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EndpointIssueKind {
    /// A response arrived but its status was not 200
    StatusMismatch { code: u16 },

    /// No response was received (connect, timeout, DNS, TLS, bad URL)
    Unreachable { detail: String },
}

/// An endpoint that failed its health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointIssue {
    pub url: String,
    #[serde(flatten)]
    pub kind: EndpointIssueKind,
}

impl EndpointIssue {
    pub fn status_mismatch(url: impl Into<String>, code: u16) -> Self {
        Self {
            url: url.into(),
            kind: EndpointIssueKind::StatusMismatch { code },
        }
    }

    pub fn unreachable(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: EndpointIssueKind::Unreachable {
                detail: detail.into(),
            },
        }
    }
}

impl fmt::Display for EndpointIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EndpointIssueKind::StatusMismatch { code } => {
                write!(f, "{} returned {}", self.url, code)
            }
            EndpointIssueKind::Unreachable { detail } => {
                write!(f, "{} unreachable: {}", self.url, detail)
            }
        }
    }
}

/// One entry of the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    Log(LogIssue),
    Endpoint(EndpointIssue),
}

impl From<LogIssue> for Issue {
    fn from(issue: LogIssue) -> Self {
        Issue::Log(issue)
    }
}

impl From<EndpointIssue> for Issue {
    fn from(issue: EndpointIssue) -> Self {
        Issue::Endpoint(issue)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Log(issue) => issue.fmt(f),
            Issue::Endpoint(issue) => issue.fmt(f),
        }
    }
}
