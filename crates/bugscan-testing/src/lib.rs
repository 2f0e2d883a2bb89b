//! Testing infrastructure for bugscan integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `TestWorld`: Fluent interface for building a workdir with config and log trees
//! - `server`: Stub HTTP endpoints that answer with a fixed status or hang

pub mod server;
pub mod world;

pub use server::StubServer;
pub use world::{CliResult, TestWorld};
