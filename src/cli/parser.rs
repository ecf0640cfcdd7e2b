//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// topic-cards: turn model replies into topic cards.
///
/// Parses `**Topic N: Name**` headed replies into sanitized records and,
/// with the `ollama` feature, generates them through a rate-limited,
/// retrying model call.
#[derive(Parser, Debug)]
#[command(name = "topic-cards")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a JSON config file.
    #[arg(short, long, env = "TOPIC_CARDS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse raw model output into topic records.
    ///
    /// Reads from FILE, or stdin when FILE is omitted or `-`.
    Parse {
        /// Path to the raw reply.
        file: Option<PathBuf>,

        /// Malformed-section policy (skip, strict).
        #[arg(short, long, default_value = "skip")]
        policy: String,
    },

    /// Strip script, style, iframe, object and embed blocks from text.
    Sanitize {
        /// Path to the text (stdin if omitted).
        file: Option<PathBuf>,
    },

    /// Show the prompts that would be sent for INPUT.
    Prompt {
        /// A theme, or a number of random topics.
        input: String,
    },

    /// Generate topics from a model and parse the reply.
    #[cfg(feature = "ollama")]
    Generate {
        /// A theme, or a number of random topics.
        input: String,

        /// Generate endpoint URL.
        #[arg(long, env = "TOPIC_CARDS_ENDPOINT")]
        endpoint: Option<String>,

        /// Model name.
        #[arg(short, long, env = "TOPIC_CARDS_MODEL")]
        model: Option<String>,

        /// Attempts per invocation, first try included.
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Minimum seconds between invocations.
        #[arg(long)]
        min_interval: Option<f64>,

        /// Backoff between attempts (fixed, exponential).
        #[arg(long)]
        backoff: Option<String>,

        /// Malformed-section policy (skip, strict).
        #[arg(short, long, default_value = "skip")]
        policy: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["topic-cards", "parse"]).unwrap();
        assert_eq!(cli.format, "text");
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Parse { file: None, ref policy } if policy == "skip"
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["topic-cards", "sanitize", "in.txt", "--format", "json", "-v"])
                .unwrap();
        assert_eq!(cli.format, "json");
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Sanitize { file: Some(ref p) } if p == &PathBuf::from("in.txt")
        ));
    }

    #[test]
    fn test_prompt_requires_input() {
        assert!(Cli::try_parse_from(["topic-cards", "prompt"]).is_err());
    }

    #[cfg(feature = "ollama")]
    #[test]
    fn test_generate_overrides() {
        let cli = Cli::try_parse_from([
            "topic-cards",
            "generate",
            "3",
            "--max-attempts",
            "5",
            "--min-interval",
            "0.5",
            "--backoff",
            "exponential",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                input,
                max_attempts,
                min_interval,
                backoff,
                ..
            } => {
                assert_eq!(input, "3");
                assert_eq!(max_attempts, Some(5));
                assert_eq!(min_interval, Some(0.5));
                assert_eq!(backoff.as_deref(), Some("exponential"));
            }
            other => unreachable!("unexpected command: {other:?}"),
        }
    }
}
