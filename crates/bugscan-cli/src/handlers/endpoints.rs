use super::{exit_code, observer, source_unreadable};
use crate::output::{ConsoleObserver, Renderer};
use anyhow::Result;
use bugscan_runtime::Orchestrator;

pub async fn handle(orchestrator: &Orchestrator, renderer: &Renderer) -> Result<i32> {
    let console = ConsoleObserver::new(orchestrator.config());
    let (outcome, diagnostics) = orchestrator
        .probe_endpoints(observer(renderer, &console))
        .await?;
    renderer.render_endpoints(&outcome, &diagnostics)?;
    Ok(exit_code(
        source_unreadable(&diagnostics),
        outcome.issues.len(),
    ))
}
