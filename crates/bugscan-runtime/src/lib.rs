pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::{Config, ConfigOverrides, ProbeSection, RunConfig, RunSection, resolve_workdir};
pub use error::{Error, Result};
pub use orchestrator::{
    NoopObserver, Orchestrator, PatternInspection, RunObserver, RunOutcome, RunState,
};
