//! End-to-end topic generation.
//!
//! Wires user input through the prompt, the rate-gated retrying invoker,
//! and the response parser.

use crate::client::ModelClient;
use crate::config::{Config, GenerationConfig};
use crate::error::{CommandError, Result};
use crate::invoke::{Clock, RateLimiter, ResilientInvoker, SystemClock};
use crate::parsing::{ParseReport, ResponseParser};
use crate::prompt::{GenerationRequest, TopicRequest};
use std::sync::Arc;

/// Turns user input into parsed topic records.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use topic_cards::client::ScriptedClient;
/// use topic_cards::config::Config;
/// use topic_cards::generator::TopicGenerator;
///
/// let client = Arc::new(ScriptedClient::new());
/// client.push_reply("**Topic 1: Mars**content A**Topic 2: Venus**content B");
///
/// let generator = TopicGenerator::from_config(client, &Config::default()).unwrap();
/// let report = generator.generate("2").unwrap();
/// assert_eq!(report.records.len(), 2);
/// ```
#[derive(Debug)]
pub struct TopicGenerator<C: ModelClient> {
    client: Arc<C>,
    invoker: ResilientInvoker,
    limiter: Arc<RateLimiter>,
    parser: ResponseParser,
    generation: GenerationConfig,
}

impl<C: ModelClient> TopicGenerator<C> {
    /// Creates a generator from explicit parts.
    #[must_use]
    pub fn new(
        client: Arc<C>,
        invoker: ResilientInvoker,
        limiter: Arc<RateLimiter>,
        parser: ResponseParser,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            client,
            invoker,
            limiter,
            parser,
            generation,
        }
    }

    /// Creates a generator on the system clock from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoker settings are invalid.
    pub fn from_config(client: Arc<C>, config: &Config) -> Result<Self> {
        Self::from_config_with_clock(client, config, Arc::new(SystemClock))
    }

    /// Creates a generator on the given clock from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoker settings are invalid.
    pub fn from_config_with_clock(
        client: Arc<C>,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let invoker = ResilientInvoker::with_clock(config.invoker.retry_policy()?, clock);
        let limiter = Arc::new(config.invoker.rate_limiter()?);
        Ok(Self::new(
            client,
            invoker,
            limiter,
            ResponseParser::new(),
            config.generation.clone(),
        ))
    }

    /// Replaces the response parser.
    #[must_use]
    pub fn with_parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    /// Returns the shared rate limiter.
    #[must_use]
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Generates and parses topics for raw user input.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidArgument`] for blank input, or an
    /// invocation or parse error.
    pub fn generate(&self, input: &str) -> Result<ParseReport> {
        let request = TopicRequest::from_input(input).ok_or_else(|| {
            CommandError::InvalidArgument("input must be a theme or a positive number".to_string())
        })?;
        self.generate_request(&request)
    }

    /// Generates and parses topics for an already interpreted request.
    ///
    /// # Errors
    ///
    /// Returns an invocation error (rate limited, retries exhausted) or a
    /// parse error under the strict policy.
    pub fn generate_request(&self, request: &TopicRequest) -> Result<ParseReport> {
        let generation = GenerationRequest::new(request, self.generation.clone());
        tracing::info!(
            client = self.client.name(),
            operation = self.limiter.key(),
            %request,
            "generating topics"
        );

        let raw = self
            .invoker
            .invoke(&self.limiter, || self.client.generate(&generation))?;

        let report = self.parser.parse(&raw)?;
        tracing::info!(
            records = report.records.len(),
            skipped = report.skipped.len(),
            "parsed model reply"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ScriptedClient;
    use crate::error::{Error, InvokeError};
    use crate::invoke::ManualClock;
    use crate::parsing::MalformedPolicy;

    fn generator(client: &Arc<ScriptedClient>) -> TopicGenerator<ScriptedClient> {
        TopicGenerator::from_config_with_clock(
            Arc::clone(client),
            &Config::default(),
            Arc::new(ManualClock::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_parses_reply() {
        let client = Arc::new(ScriptedClient::new());
        client.push_reply("**Topic 1: Mars**content A**Topic 2: Venus**content B");

        let report = generator(&client).generate("The solar system").unwrap();
        assert_eq!(report.records[0].title, "Topic 1: Mars");
        assert_eq!(client.prompts(), vec!["The solar system".to_string()]);
    }

    #[test]
    fn test_generate_retries_client_failures() {
        let client = Arc::new(ScriptedClient::new());
        client.push_failure("503");
        client.push_reply("**Topic 1: Ok**body");

        let report = generator(&client).generate("1").unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn test_generate_exhausts() {
        let client = Arc::new(ScriptedClient::new());
        let result = generator(&client).generate("3");
        assert!(matches!(
            result,
            Err(Error::Invoke(InvokeError::ExhaustedRetries { attempts: 3, .. }))
        ));
        assert_eq!(client.calls(), 3);
    }

    #[test]
    fn test_generate_rejects_blank_input() {
        let client = Arc::new(ScriptedClient::new());
        let result = generator(&client).generate("  ");
        assert!(matches!(result, Err(Error::Command(_))));
        assert_eq!(client.calls(), 0);
    }

    #[test]
    fn test_generate_second_call_rate_limited() {
        let client = Arc::new(ScriptedClient::new());
        client.push_reply("**Topic 1**a");
        client.push_reply("**Topic 1**b");
        let generator = generator(&client);

        assert!(generator.generate("1").is_ok());
        assert!(matches!(
            generator.generate("1"),
            Err(Error::Invoke(InvokeError::RateLimited { .. }))
        ));
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_generate_strict_parser() {
        let client = Arc::new(ScriptedClient::new());
        client.push_reply("**Topic 1 unterminated");
        let generator = generator(&client).with_parser(ResponseParser::with_policy(MalformedPolicy::Strict));

        assert!(matches!(generator.generate("1"), Err(Error::Parse(_))));
    }
}
