//! Prompts for topic-card generation.
//!
//! The system prompt fixes the output convention the parser relies on: each
//! card starts with a `**Topic N: Name**` heading.

use crate::config::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = r"You write long-form, journalistic articles on request.

When the user gives you a broad theme, pick a specific, related subtopic at random and write about it in depth. If the theme were 'The Universe', you might choose black holes, stellar nurseries, or the fate of galaxies.

When the user gives you only a number N, choose N unrelated subjects yourself, drawn from a wide range of fields such as science, history, art, technology, and culture, and write a full article for each.

Every article must:
- give background and context for the subject,
- cover the key scientific, historical, or cultural facts,
- keep the reader engaged with examples, anecdotes, or competing theories,
- close with takeaways or open questions.

Stay factually accurate and write in a clear, well-structured narrative voice.

Start every article with a heading on its own line, exactly in this form:
**Topic 1: [Topic Name]**
and number the headings consecutively.";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TopicRequest {
    /// Write about one subtopic of a broad theme.
    Theme(String),
    /// Pick this many unrelated subjects.
    Count(u32),
}

impl TopicRequest {
    /// Interprets raw user input.
    ///
    /// A bare positive integer is a topic count; anything else non-blank is
    /// a theme. Blank input and zero yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use topic_cards::prompt::TopicRequest;
    ///
    /// assert_eq!(TopicRequest::from_input(" 5 "), Some(TopicRequest::Count(5)));
    /// assert_eq!(
    ///     TopicRequest::from_input("The Universe"),
    ///     Some(TopicRequest::Theme("The Universe".to_string()))
    /// );
    /// assert_eq!(TopicRequest::from_input("   "), None);
    /// ```
    #[must_use]
    pub fn from_input(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<u32>() {
            Ok(0) => None,
            Ok(count) => Some(Self::Count(count)),
            Err(_) => Some(Self::Theme(trimmed.to_string())),
        }
    }

    /// Returns the user message for this request.
    #[must_use]
    pub fn user_prompt(&self) -> String {
        match self {
            Self::Theme(theme) => theme.clone(),
            Self::Count(count) => count.to_string(),
        }
    }
}

impl fmt::Display for TopicRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Theme(theme) => write!(f, "theme '{theme}'"),
            Self::Count(1) => f.write_str("1 random topic"),
            Self::Count(count) => write!(f, "{count} random topics"),
        }
    }
}

/// Everything a model client needs for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System instruction.
    pub system: String,
    /// User message.
    pub prompt: String,
    /// Sampling parameters.
    pub options: GenerationConfig,
}

impl GenerationRequest {
    /// Builds a request with the default system prompt.
    #[must_use]
    pub fn new(request: &TopicRequest, options: GenerationConfig) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            prompt: request.user_prompt(),
            options,
        }
    }

    /// Replaces the system prompt.
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }
}
