//! Structuring of raw model output into topic records.
//!
//! Model replies follow a `**Topic N: Name**` heading convention. This
//! module splits a reply into records:
//!
//! - **Scanner**: one section per opening token, each bounded by the next
//! - **Policy**: what happens to headings that never close
//! - **Sanitize**: strips script/style/iframe/object/embed pairs from every record

pub mod parser;
pub mod policy;
pub mod sanitize;
pub mod scanner;

pub use parser::{ParseReport, ResponseParser, SkippedSection};
pub use policy::{MalformedPolicy, available_policies};
pub use sanitize::{DENIED_TAGS, DeniedTag, contains_denied_markup, sanitize};
pub use scanner::{HEADING_CLOSE, HEADING_OPEN, Scanner, Section};

use crate::core::TopicRecord;

/// Extracts topic records from raw model output.
///
/// Total over all inputs: malformed sections are dropped and an input
/// without headings yields an empty vector. Use [`ResponseParser`] to
/// see which sections were dropped or to fail on them instead.
///
/// # Examples
///
/// ```
/// use topic_cards::parsing::extract;
///
/// let records = extract("**Topic 1: Mars**content A**Topic 2: Venus**content B");
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].title, "Topic 2: Venus");
/// assert_eq!(records[1].content, "content B");
/// ```
#[must_use]
pub fn extract(raw: &str) -> Vec<TopicRecord> {
    parser::lenient_report(raw).into_records()
}
