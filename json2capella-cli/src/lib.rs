//! Command-line front end for json2capella.
//!
//! Exposes the argument definitions, config file handling, the terminal
//! conflict prompt and the command implementations so that the binary stays
//! a thin wrapper around [`commands::run`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod prompt;

pub use cli::Cli;
pub use commands::{exit_code, run};
pub use config::FileConfig;
pub use prompt::PromptResolver;
