//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{OutputFormat, format_prompt, format_report, format_sanitized};
use crate::cli::parser::{Cli, Commands};
use crate::config::{Config, GenerationConfig};
use crate::error::{CommandError, Result};
use crate::io::read_input;
use crate::parsing::{MalformedPolicy, ResponseParser, sanitize};
use crate::prompt::{GenerationRequest, TopicRequest};
use std::borrow::Cow;
use std::path::Path;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Parse { file, policy } => cmd_parse(file.as_deref(), policy, format),
        Commands::Sanitize { file } => cmd_sanitize(file.as_deref(), format),
        Commands::Prompt { input } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_prompt(input, &config.generation, format)
        }
        #[cfg(feature = "ollama")]
        Commands::Generate {
            input,
            endpoint,
            model,
            max_attempts,
            min_interval,
            backoff,
            policy,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            let overrides = GenerateOverrides {
                endpoint: endpoint.as_deref(),
                model: model.as_deref(),
                max_attempts: *max_attempts,
                min_interval: *min_interval,
                backoff: backoff.as_deref(),
            };
            overrides.apply(&mut config)?;
            cmd_generate(input, &config, policy, format)
        }
    }
}

/// Loads the config file if one was given, else defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    path.map_or_else(|| Ok(Config::default()), Config::load)
}

fn parse_policy(policy: &str) -> Result<MalformedPolicy> {
    Ok(policy.parse::<MalformedPolicy>()?)
}

fn cmd_parse(file: Option<&Path>, policy: &str, format: OutputFormat) -> Result<String> {
    let parser = ResponseParser::with_policy(parse_policy(policy)?);
    let raw = read_input(file)?;
    let report = parser.parse(&raw)?;
    Ok(format_report(&report, format))
}

fn cmd_sanitize(file: Option<&Path>, format: OutputFormat) -> Result<String> {
    let raw = read_input(file)?;
    let cleaned = sanitize(&raw);
    let changed = matches!(cleaned, Cow::Owned(_));
    Ok(format_sanitized(&cleaned, changed, format))
}

fn cmd_prompt(input: &str, generation: &GenerationConfig, format: OutputFormat) -> Result<String> {
    let request = topic_request(input)?;
    let generation = GenerationRequest::new(&request, generation.clone());
    Ok(format_prompt(&generation, format))
}

fn topic_request(input: &str) -> Result<TopicRequest> {
    TopicRequest::from_input(input).ok_or_else(|| {
        CommandError::InvalidArgument("input must be a theme or a positive number".to_string())
            .into()
    })
}

/// Command-line values that take precedence over the config file.
#[cfg(feature = "ollama")]
struct GenerateOverrides<'a> {
    endpoint: Option<&'a str>,
    model: Option<&'a str>,
    max_attempts: Option<u32>,
    min_interval: Option<f64>,
    backoff: Option<&'a str>,
}

#[cfg(feature = "ollama")]
impl GenerateOverrides<'_> {
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(endpoint) = self.endpoint {
            config.client.endpoint = endpoint.to_string();
        }
        if let Some(model) = self.model {
            config.client.model = model.to_string();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.invoker.max_attempts = max_attempts;
        }
        if let Some(min_interval) = self.min_interval {
            config.invoker.min_interval_secs = min_interval;
        }
        if let Some(backoff) = self.backoff {
            config.invoker.backoff = backoff.parse()?;
        }
        config.validate()
    }
}

#[cfg(feature = "ollama")]
fn cmd_generate(
    input: &str,
    config: &Config,
    policy: &str,
    format: OutputFormat,
) -> Result<String> {
    use crate::client::OllamaClient;
    use crate::generator::TopicGenerator;
    use std::sync::Arc;

    let parser = ResponseParser::with_policy(parse_policy(policy)?);
    let request = topic_request(input)?;
    let client = Arc::new(OllamaClient::from_config(&config.client)?);
    let generator = TopicGenerator::from_config(client, config)?.with_parser(parser);

    let report = generator.generate_request(&request)?;
    Ok(format_report(&report, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ParseError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cmd_parse_text() {
        let file = temp_file("**Topic 1: Mars**content A**Topic 2: Venus**content B");
        let output = cmd_parse(Some(file.path()), "skip", OutputFormat::Text).unwrap();
        assert!(output.contains("Topic 1: Mars"));
        assert!(output.contains("content B"));
    }

    #[test]
    fn test_cmd_parse_strict_fails_on_malformed() {
        let file = temp_file("**Topic 1: Mars**ok**Topic 2 never closed");
        let result = cmd_parse(Some(file.path()), "strict", OutputFormat::Text);
        assert!(matches!(
            result,
            Err(Error::Parse(ParseError::MalformedSection { index: 1, .. }))
        ));
    }

    #[test]
    fn test_cmd_parse_unknown_policy() {
        let file = temp_file("");
        let result = cmd_parse(Some(file.path()), "loose", OutputFormat::Text);
        assert!(matches!(
            result,
            Err(Error::Parse(ParseError::UnknownPolicy { .. }))
        ));
    }

    #[test]
    fn test_cmd_parse_missing_file() {
        let result = cmd_parse(
            Some(Path::new("/nonexistent/reply.txt")),
            "skip",
            OutputFormat::Text,
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_cmd_sanitize() {
        let file = temp_file("a<script>x</script>b");
        let output = cmd_sanitize(Some(file.path()), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["text"], "ab");
        assert_eq!(value["changed"], true);
    }

    #[test]
    fn test_cmd_prompt() {
        let output = cmd_prompt("4", &GenerationConfig::default(), OutputFormat::Text).unwrap();
        assert!(output.contains("**Topic 1: [Topic Name]**"));
        assert!(output.contains("User:\n---\n4\n"));
    }

    #[test]
    fn test_cmd_prompt_rejects_blank() {
        let result = cmd_prompt("   ", &GenerationConfig::default(), OutputFormat::Text);
        assert!(matches!(result, Err(Error::Command(_))));
    }

    #[test]
    fn test_load_config_defaults_and_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.invoker.max_attempts, 3);

        let file = temp_file(r#"{"invoker": {"max_attempts": 7}}"#);
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.invoker.max_attempts, 7);
    }

    #[cfg(feature = "ollama")]
    #[test]
    fn test_overrides_apply_and_validate() {
        let mut config = Config::default();
        let overrides = GenerateOverrides {
            endpoint: Some("http://127.0.0.1:1/api/generate"),
            model: Some("mistral"),
            max_attempts: Some(5),
            min_interval: Some(0.25),
            backoff: Some("exponential"),
        };
        overrides.apply(&mut config).unwrap();
        assert_eq!(config.client.model, "mistral");
        assert_eq!(config.invoker.max_attempts, 5);
        assert!((config.invoker.min_interval_secs - 0.25).abs() < f64::EPSILON);

        let bad = GenerateOverrides {
            endpoint: None,
            model: None,
            max_attempts: Some(0),
            min_interval: None,
            backoff: None,
        };
        assert!(bad.apply(&mut config).is_err());
    }

    #[cfg(feature = "ollama")]
    #[test]
    fn test_overrides_reject_unknown_backoff() {
        let mut config = Config::default();
        let overrides = GenerateOverrides {
            endpoint: None,
            model: None,
            max_attempts: None,
            min_interval: None,
            backoff: Some("linear"),
        };
        assert!(overrides.apply(&mut config).is_err());
    }
}
