//! CLI layer for topic-cards.
//!
//! Provides the command-line interface using clap, with commands for
//! parsing and sanitizing model replies, previewing prompts, and
//! generating topics from a model.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
