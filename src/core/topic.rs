//! Topic record representation.
//!
//! A topic record is one card extracted from model output: a heading title
//! and the body text that follows it.

use crate::io::find_char_boundary;
use serde::{Deserialize, Serialize};

/// A parsed `(title, content)` pair extracted from model output.
///
/// Records are built fresh on every parse and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use topic_cards::core::TopicRecord;
///
/// let record = TopicRecord::new("Topic 1: Mars", "The red planet.");
/// assert_eq!(record.title(), "Topic 1: Mars");
/// assert_eq!(record.preview(7), "The red");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Heading text, always starting with `Topic`.
    pub title: String,

    /// Sanitized body text following the heading.
    pub content: String,
}

impl TopicRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Returns the record title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the record content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns true when the heading had no body text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the first `max_len` bytes of content, backed off to a char boundary.
    #[must_use]
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            &self.content[..find_char_boundary(&self.content, max_len)]
        }
    }
}
