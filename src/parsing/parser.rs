//! Response parser turning raw model output into topic records.

use crate::core::TopicRecord;
use crate::error::{ParseError, Result};
use crate::parsing::policy::MalformedPolicy;
use crate::parsing::sanitize::sanitize;
use crate::parsing::scanner::{Scanner, Section, TITLE_PREFIX};
use serde::{Deserialize, Serialize};

/// A malformed section that was dropped during a lenient parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSection {
    /// Zero-based index among all sections.
    pub index: usize,
    /// Byte offset of the opening token.
    pub offset: usize,
    /// Length in bytes of the dropped span.
    pub len: usize,
}

/// Outcome of a parse: extracted records plus any dropped sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Records in heading order.
    pub records: Vec<TopicRecord>,
    /// Sections dropped under the lenient policy.
    pub skipped: Vec<SkippedSection>,
}

impl ParseReport {
    /// Returns true when no headings were found at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.skipped.is_empty()
    }

    /// Returns true when at least one section was dropped.
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Consumes the report, returning only the records.
    #[must_use]
    pub fn into_records(self) -> Vec<TopicRecord> {
        self.records
    }
}

/// Parser for `**Topic <identifier>**` delimited model output.
///
/// # Examples
///
/// ```
/// use topic_cards::parsing::{MalformedPolicy, ResponseParser};
///
/// let parser = ResponseParser::new();
/// let report = parser.parse("**Topic 1: Mars**red**Topic 2 unclosed").unwrap();
/// assert_eq!(report.records.len(), 1);
/// assert_eq!(report.skipped.len(), 1);
///
/// let strict = ResponseParser::with_policy(MalformedPolicy::Strict);
/// assert!(strict.parse("**Topic 2 unclosed").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseParser {
    policy: MalformedPolicy,
}

impl ResponseParser {
    /// Creates a lenient parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: MalformedPolicy::Skip,
        }
    }

    /// Creates a parser with the given malformed-section policy.
    #[must_use]
    pub const fn with_policy(policy: MalformedPolicy) -> Self {
        Self { policy }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Parses raw model output.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedSection`] for the first malformed
    /// section when the policy is [`MalformedPolicy::Strict`]. Never fails
    /// under [`MalformedPolicy::Skip`].
    pub fn parse(&self, raw: &str) -> Result<ParseReport> {
        let report = lenient_report(raw);
        match (self.policy, report.skipped.first()) {
            (MalformedPolicy::Strict, Some(first)) => Err(ParseError::MalformedSection {
                index: first.index,
                offset: first.offset,
            }
            .into()),
            _ => Ok(report),
        }
    }
}

/// Scans every section, keeping well-formed ones and noting the rest.
pub(crate) fn lenient_report(raw: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for section in Scanner::new(raw) {
        match section {
            Section::Heading {
                identifier, body, ..
            } => report.records.push(build_record(identifier, body)),
            Section::Malformed {
                index,
                offset,
                span,
            } => {
                tracing::debug!(index, offset, len = span.len(), "skipping malformed topic section");
                report.skipped.push(SkippedSection {
                    index,
                    offset,
                    len: span.len(),
                });
            }
        }
    }

    report
}

fn build_record(identifier: &str, body: &str) -> TopicRecord {
    let title = format!("{TITLE_PREFIX}{}", sanitize(identifier));
    let content = sanitize(body);
    TopicRecord::new(title.trim(), content.trim())
}
