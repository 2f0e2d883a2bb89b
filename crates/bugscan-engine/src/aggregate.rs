use bugscan_types::{EndpointIssue, Issue, LogIssue, Report};

/// Concatenate log issues and endpoint issues into one report.
///
/// Log issues come first; both inputs keep their order. Nothing is
/// deduplicated, sorted or filtered.
pub fn aggregate(log_issues: Vec<LogIssue>, endpoint_issues: Vec<EndpointIssue>) -> Report {
    let mut issues = Vec::with_capacity(log_issues.len() + endpoint_issues.len());
    issues.extend(log_issues.into_iter().map(Issue::Log));
    issues.extend(endpoint_issues.into_iter().map(Issue::Endpoint));
    Report::new(issues)
}
