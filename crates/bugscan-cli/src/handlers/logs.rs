use super::{exit_code, observer, source_unreadable};
use crate::output::{ConsoleObserver, Renderer};
use anyhow::Result;
use bugscan_runtime::Orchestrator;

pub async fn handle(orchestrator: &Orchestrator, renderer: &Renderer) -> Result<i32> {
    let console = ConsoleObserver::new(orchestrator.config());
    let outcome = orchestrator
        .scan_logs(observer(renderer, &console))
        .await?;
    renderer.render_logs(&outcome)?;
    Ok(exit_code(
        source_unreadable(&outcome.diagnostics),
        outcome.issues.len(),
    ))
}
