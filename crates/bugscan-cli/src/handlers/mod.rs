pub mod endpoints;
pub mod logs;
pub mod patterns;
pub mod run;

use crate::output::{ConsoleObserver, Renderer};
use bugscan_runtime::{NoopObserver, RunObserver};
use bugscan_types::{Diagnostic, DiagnosticKind};

/// Progress goes to the console only in plain mode
fn observer<'a>(renderer: &Renderer, console: &'a ConsoleObserver) -> &'a dyn RunObserver {
    if renderer.is_json() {
        &NoopObserver
    } else {
        console
    }
}

/// True when the named source failed to load
fn source_unreadable(diagnostics: &[Diagnostic]) -> bool {
    diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::ConfigLoad)
}

/// Exit status for a single-source command
fn exit_code(unreadable: bool, issues: usize) -> i32 {
    if unreadable {
        2
    } else if issues > 0 {
        1
    } else {
        0
    }
}
