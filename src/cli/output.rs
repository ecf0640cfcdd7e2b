//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::TopicRecord;
use crate::error::Error;
use crate::parsing::ParseReport;
use crate::prompt::GenerationRequest;
use serde::Serialize;
use std::fmt::Write;

/// Width of the content preview in text tables.
const PREVIEW_WIDTH: usize = 48;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a parse report.
#[must_use]
pub fn format_report(report: &ParseReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_report_text(report),
        OutputFormat::Json => format_json(report),
    }
}

fn format_report_text(report: &ParseReport) -> String {
    let mut output = format_records_text(&report.records);
    if report.has_skipped() {
        let _ = writeln!(
            output,
            "\nSkipped {} malformed section(s):",
            report.skipped.len()
        );
        for skipped in &report.skipped {
            let _ = writeln!(
                output,
                "  section {} at byte {} ({} bytes)",
                skipped.index, skipped.offset, skipped.len
            );
        }
    }
    output
}

fn format_records_text(records: &[TopicRecord]) -> String {
    if records.is_empty() {
        return "No topics found.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(output, "{:<4} {:<32} Preview", "#", "Title");
    output.push_str(&"-".repeat(84));
    output.push('\n');

    for (i, record) in records.iter().enumerate() {
        let mut preview = record.preview(PREVIEW_WIDTH).replace('\n', " ");
        if preview.len() < record.content.len() {
            preview.push_str("...");
        }
        let _ = writeln!(
            output,
            "{:<4} {:<32} {}",
            i + 1,
            truncate(&record.title, 32),
            preview
        );
    }

    output
}

/// Formats sanitized text.
#[must_use]
pub fn format_sanitized(text: &str, changed: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = text.to_string();
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct SanitizeOutput<'a> {
                changed: bool,
                text: &'a str,
            }
            format_json(&SanitizeOutput { changed, text })
        }
    }
}

/// Formats the prompts for a generation request.
#[must_use]
pub fn format_prompt(request: &GenerationRequest, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str("System:\n---\n");
            output.push_str(&request.system);
            output.push_str("\n---\n\nUser:\n---\n");
            output.push_str(&request.prompt);
            output.push_str("\n---\n");
            output
        }
        OutputFormat::Json => format_json(request),
    }
}

/// Formats an error for display.
///
/// Text output is the error chain joined with `: `; JSON output carries the
/// message under `error`.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            let _ = write!(message, ": {cause_text}");
        }
        source = cause.source();
    }

    match format {
        OutputFormat::Text => message,
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput<'a> {
                error: &'a str,
            }
            format_json(&ErrorOutput { error: &message })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Truncates a string to at most `max_len` bytes with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        let end = crate::io::find_char_boundary(s, max_len);
        return s[..end].to_string();
    }
    let end = crate::io::find_char_boundary(s, max_len - 3);
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::error::InvokeError;
    use crate::parsing::SkippedSection;
    use crate::prompt::TopicRequest;

    fn report() -> ParseReport {
        ParseReport {
            records: vec![
                TopicRecord::new("Topic 1: Mars", "The red planet."),
                TopicRecord::new("Topic 2: Venus", "Second from the sun."),
            ],
            skipped: vec![SkippedSection {
                index: 2,
                offset: 70,
                len: 12,
            }],
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("unknown"), OutputFormat::Text);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("héllo", 2), "h");
    }

    #[test]
    fn test_format_report_text() {
        let text = format_report(&report(), OutputFormat::Text);
        assert!(text.contains("Topic 1: Mars"));
        assert!(text.contains("Second from the sun."));
        assert!(text.contains("Skipped 1 malformed section(s)"));
        assert!(text.contains("section 2 at byte 70"));
    }

    #[test]
    fn test_format_report_json() {
        let json = format_report(&report(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"][1]["title"], "Topic 2: Venus");
        assert_eq!(value["skipped"][0]["offset"], 70);
    }

    #[test]
    fn test_format_report_empty() {
        let empty = ParseReport::default();
        assert_eq!(
            format_report(&empty, OutputFormat::Text),
            "No topics found.\n"
        );
    }

    #[test]
    fn test_text_table_uses_record_preview() {
        let long = "word ".repeat(20);
        let report = ParseReport {
            records: vec![TopicRecord::new("Topic 1: Long", long.as_str())],
            skipped: Vec::new(),
        };
        let text = format_report(&report, OutputFormat::Text);
        let expected = format!("{}...", report.records[0].preview(PREVIEW_WIDTH));
        assert!(text.contains(&expected));
        assert!(!text.contains(long.trim_end()));
    }

    #[test]
    fn test_format_sanitized() {
        assert_eq!(format_sanitized("abc", false, OutputFormat::Text), "abc\n");
        let json = format_sanitized("abc", true, OutputFormat::Json);
        assert!(json.contains("\"changed\": true"));
    }

    #[test]
    fn test_format_prompt() {
        let request = GenerationRequest::new(&TopicRequest::Count(2), GenerationConfig::default());
        let text = format_prompt(&request, OutputFormat::Text);
        assert!(text.contains("System:"));
        assert!(text.contains("User:\n---\n2\n"));

        let json = format_prompt(&request, OutputFormat::Json);
        assert!(json.contains("\"prompt\": \"2\""));
    }

    #[test]
    fn test_format_error_includes_source() {
        let error = Error::Invoke(InvokeError::ExhaustedRetries {
            operation: "topicgen".to_string(),
            attempts: 3,
            source: "connection refused".into(),
        });
        let text = format_error(&error, OutputFormat::Text);
        assert!(text.contains("connection refused"));

        let json = format_error(&error, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["error"].as_str().unwrap().contains("topicgen"));
    }
}
