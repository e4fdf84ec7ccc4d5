//! Command Line Interface (CLI) layer for depthprep.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the `resize`, `filter`,
//! `download` and `models` subcommands. It wires user-provided options to the
//! library functionality exposed via `depthprep::api` and `depthprep::io`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
