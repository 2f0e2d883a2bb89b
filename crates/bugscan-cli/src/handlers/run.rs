use super::observer;
use crate::output::{ConsoleObserver, Renderer};
use anyhow::Result;
use bugscan_runtime::Orchestrator;

pub async fn handle(orchestrator: &Orchestrator, renderer: &Renderer) -> Result<i32> {
    let console = ConsoleObserver::new(orchestrator.config());
    let outcome = orchestrator.run(observer(renderer, &console)).await?;
    renderer.render_run(&outcome)?;
    Ok(outcome.verdict.exit_code())
}
