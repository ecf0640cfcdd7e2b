//! # topic-cards
//!
//! Turns long-form model replies into topic cards.
//!
//! Replies follow a `**Topic N: Name**` heading convention. The crate splits
//! them into sanitized [`TopicRecord`]s and wraps the model call that
//! produces them in a rate gate and a bounded retry loop.
//!
//! ## Features
//!
//! - **Parsing**: heading scanner bounded by every opening token with a named policy for malformed sections
//! - **Sanitizing**: removes script, style, iframe, object and embed blocks
//! - **Resilient invocation**: per-operation minimum interval plus fixed or exponential backoff
//! - **Model clients**: Ollama-compatible HTTP client (feature `ollama`) and a scripted client
//!
//! ## Example
//!
//! ```
//! use topic_cards::extract;
//!
//! let records = extract("**Topic 1: Tides**Moon and sun.<script>x</script>");
//! assert_eq!(records[0].title, "Topic 1: Tides");
//! assert_eq!(records[0].content, "Moon and sun.");
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod generator;
pub mod invoke;
pub mod io;
pub mod parsing;
pub mod prompt;

// Re-export commonly used types at crate root
pub use error::{BoxError, Error, Result};

// Re-export core domain types
pub use core::TopicRecord;

// Re-export parsing types
pub use parsing::{MalformedPolicy, ParseReport, ResponseParser, extract, sanitize};

// Re-export invocation types
pub use invoke::{
    Backoff, Clock, ManualClock, RateLimitTable, RateLimiter, ResilientInvoker, RetryPolicy,
    SystemClock,
};

// Re-export client and generation types
#[cfg(feature = "ollama")]
pub use client::OllamaClient;
pub use client::{ModelClient, ScriptedClient};
pub use config::Config;
pub use generator::TopicGenerator;

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
