use crate::Issue;
use serde::{Deserialize, Serialize};

/// Ordered issues of one run: log issues first, then endpoint issues
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    issues: Vec<Issue>,
}

impl Report {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// One pre-formatted line per issue, in report order
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.issues.iter().map(ToString::to_string)
    }
}

/// Three-way outcome of a run, mapped to the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunVerdict {
    /// Ran cleanly, nothing to report
    Clean,
    /// Ran cleanly, the report is non-empty
    IssuesFound,
    /// Neither the pattern source nor the endpoint source could be loaded
    CouldNotRun,
}

impl RunVerdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunVerdict::Clean => 0,
            RunVerdict::IssuesFound => 1,
            RunVerdict::CouldNotRun => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EndpointIssue, LogIssue};

    #[test]
    fn test_lines_follow_issue_order() {
        let report = Report::new(vec![
            LogIssue::new("a.log", 1, "panic").into(),
            EndpointIssue::status_mismatch("http://x", 500).into(),
        ]);

        let lines: Vec<String> = report.lines().collect();
        assert_eq!(
            lines,
            vec!["[a.log | Line 1]: panic", "http://x returned 500"]
        );
    }

    #[test]
    fn test_verdict_exit_codes_are_distinct() {
        assert_eq!(RunVerdict::Clean.exit_code(), 0);
        assert_eq!(RunVerdict::IssuesFound.exit_code(), 1);
        assert_eq!(RunVerdict::CouldNotRun.exit_code(), 2);
    }
}
