pub mod diagnostic;
pub mod endpoint;
pub mod issue;
pub mod report;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use endpoint::Endpoint;
pub use issue::{EndpointIssue, EndpointIssueKind, Issue, LogIssue};
pub use report::{Report, RunVerdict};
