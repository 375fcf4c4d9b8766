//! Command-line reporter for the Cronofy calendar API.
//!
//! This crate provides the `cronofy` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod report;
pub mod secret;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{ClientError, ClientResult};
