//! Model clients.
//!
//! A [`ModelClient`] performs exactly one round trip to a hosted model.
//! Retries and rate limiting are layered on top by the invoker, so clients
//! stay single-shot.

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::OllamaClient;

use crate::error::ClientError;
use crate::prompt::GenerationRequest;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One round trip to a hosted model.
pub trait ModelClient: Send + Sync {
    /// Sends the request and returns the raw reply text.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport, status, or decoding failure.
    fn generate(&self, request: &GenerationRequest) -> Result<String, ClientError>;

    /// Returns a short client name for logs.
    fn name(&self) -> &'static str;
}

/// A client that replays canned replies in order.
///
/// # Examples
///
/// ```
/// use topic_cards::client::{ModelClient, ScriptedClient};
/// use topic_cards::config::GenerationConfig;
/// use topic_cards::prompt::{GenerationRequest, TopicRequest};
///
/// let client = ScriptedClient::new();
/// client.push_failure("timeout");
/// client.push_reply("**Topic 1: Mars**red");
///
/// let request = GenerationRequest::new(&TopicRequest::Count(1), GenerationConfig::default());
/// assert!(client.generate(&request).is_err());
/// assert_eq!(client.generate(&request).unwrap(), "**Topic 1: Mars**red");
/// assert_eq!(client.calls(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    /// Creates a client with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().push_back(Ok(reply.into()));
    }

    /// Queues a failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().push_back(Err(message.into()));
    }

    /// Returns how many times `generate` was called.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the user prompts received, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl ModelClient for ScriptedClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(request.prompt.clone());
        match self.replies.lock().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ClientError::Scripted(message)),
            None => Err(ClientError::Exhausted),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
