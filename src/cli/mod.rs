//! Command Line Interface (CLI) layer for PixelMagic.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for each subcommand. It wires
//! user-provided options to the library functionality exposed via
//! `pixelmagic::api`, printing a JSON status document per command.
//!
//! If you are embedding PixelMagic into another application, prefer using
//! the high-level `pixelmagic::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
