use crate::output::Renderer;
use anyhow::Result;
use bugscan_runtime::Orchestrator;

pub fn handle(orchestrator: &Orchestrator, renderer: &Renderer) -> Result<i32> {
    let inspection = orchestrator.inspect_patterns();
    renderer.render_patterns(&inspection)?;
    Ok(if inspection.loaded { 0 } else { 2 })
}
