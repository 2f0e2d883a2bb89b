use super::args::{Cli, Commands, RunArgs};
use super::handlers;
use crate::logging;
use crate::output::Renderer;
use anyhow::{Context, Result};
use bugscan_runtime::{Config, ConfigOverrides, Orchestrator, resolve_workdir};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "bugscan.toml";

/// Parse-independent entry point. Returns the process exit status.
pub fn run(cli: Cli) -> Result<i32> {
    logging::init(cli.log_level);

    let workdir = resolve_workdir(cli.workdir.as_deref())?;
    let config_path = match &cli.config {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => workdir.join(path),
        None => workdir.join(DEFAULT_CONFIG_FILE),
    };
    // An explicitly named config file must exist.
    if cli.config.is_some() && !config_path.exists() {
        anyhow::bail!("config file not found: {}", config_path.display());
    }

    let command = cli.command.unwrap_or(Commands::Run {
        args: RunArgs::default(),
    });
    let overrides = command.overrides();
    let orchestrator = build_orchestrator(config_path, &workdir, overrides)?;
    let renderer = Renderer::new(cli.format);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    install_interrupt_handler(&orchestrator);

    runtime.block_on(async {
        match command {
            Commands::Run { .. } => handlers::run::handle(&orchestrator, &renderer).await,
            Commands::Logs { .. } => handlers::logs::handle(&orchestrator, &renderer).await,
            Commands::Endpoints { .. } => {
                handlers::endpoints::handle(&orchestrator, &renderer).await
            }
            Commands::Patterns { .. } => handlers::patterns::handle(&orchestrator, &renderer),
        }
    })
}

fn build_orchestrator(
    config_path: PathBuf,
    workdir: &std::path::Path,
    overrides: ConfigOverrides,
) -> Result<Orchestrator> {
    let config = Config::load_from(&config_path)?
        .apply(overrides)
        .resolve(workdir)?;
    tracing::debug!(?config, "resolved run configuration");
    Ok(Orchestrator::new(config))
}

fn install_interrupt_handler(orchestrator: &Orchestrator) {
    let token = orchestrator.cancel_token();
    let handler = move || {
        // Second interrupt: stop waiting for partial results.
        if token.is_cancelled() {
            std::process::exit(130);
        }
        token.cancel();
    };
    if let Err(err) = ctrlc::set_handler(handler) {
        tracing::warn!(error = %err, "could not install Ctrl-C handler");
    }
}
