//! Matching and aggregation pipeline for bugscan.
//!
//! Each stage turns per-item failures into either a [`Diagnostic`] or an
//! [`Issue`](bugscan_types::Issue); nothing here aborts a whole run because one
//! file, pattern or endpoint misbehaved.
//!
//! [`Diagnostic`]: bugscan_types::Diagnostic

// Error types
pub mod error;

// Line-oriented config sources
pub mod source;

// Pattern compilation
pub mod pattern;

// Log tree scanning
pub mod scanner;

// HTTP health checks
pub mod probe;

// Report assembly and persistence
pub mod aggregate;
pub mod sink;

// Run-level cancellation
pub mod cancel;

pub use aggregate::aggregate;
pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use pattern::{Pattern, PatternSet, RejectedPattern};
pub use probe::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, EndpointProbe, ProbeOutcome, ProbeSettings};
pub use scanner::{DEFAULT_LOG_SUFFIX, LogLine, LogScanner, ScanOutcome, scan};
pub use sink::{FileSink, ReportSink};
pub use source::load_lines;
