mod args;
mod commands;
mod handlers;
pub mod logging;
pub mod output;
pub mod types;

pub use args::{Cli, Commands, EndpointsArgs, LogsArgs, PatternsArgs, RunArgs};
pub use commands::run;
