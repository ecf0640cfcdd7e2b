//! Heading scanner over raw model output.
//!
//! Locates every `**Topic` opening token up front, then yields one
//! [`Section`] per token. Each section is bounded by the next opening token,
//! so a heading can never swallow the one after it. Text before the first
//! opening token is ignored.

/// Opening token of a topic heading.
pub const HEADING_OPEN: &str = "**Topic";

/// Closing token of a topic heading.
pub const HEADING_CLOSE: &str = "**";

/// Word restored in front of the identifier, since it is part of the opening token.
pub const TITLE_PREFIX: &str = "Topic";

/// One heading-delimited section of model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    /// A heading with a closing token, and the body up to the next heading.
    Heading {
        /// Zero-based position among all sections.
        index: usize,
        /// Byte offset of the opening token.
        offset: usize,
        /// Raw text between the opening and closing tokens.
        identifier: &'a str,
        /// Raw text between the closing token and the next opening token.
        body: &'a str,
    },
    /// An opening token with no closing token on its line.
    Malformed {
        /// Zero-based position among all sections.
        index: usize,
        /// Byte offset of the opening token.
        offset: usize,
        /// Everything from the opening token up to the next heading.
        span: &'a str,
    },
}

impl Section<'_> {
    /// Returns the zero-based section index.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Heading { index, .. } | Self::Malformed { index, .. } => *index,
        }
    }

    /// Returns the byte offset of the opening token.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Heading { offset, .. } | Self::Malformed { offset, .. } => *offset,
        }
    }
}

/// Iterator over the sections of a raw reply.
///
/// # Examples
///
/// ```
/// use topic_cards::parsing::{Scanner, Section};
///
/// let mut scanner = Scanner::new("**Topic 1: Mars**red");
/// assert!(matches!(
///     scanner.next(),
///     Some(Section::Heading { identifier: " 1: Mars", body: "red", .. })
/// ));
/// assert!(scanner.next().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    opens: Vec<usize>,
    index: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over every opening token in `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            opens: text.match_indices(HEADING_OPEN).map(|(i, _)| i).collect(),
            index: 0,
        }
    }

    /// Finds the closing token inside `from..to`, the text between an
    /// opening token and the next one.
    ///
    /// The closing token must sit on the same line as the opening token and
    /// end before `to`, so it never overlaps the next heading.
    fn find_close(&self, from: usize, to: usize) -> Option<usize> {
        let region = &self.text[from..to];
        let line = region.find('\n').map_or(region, |nl| &region[..nl]);
        line.find(HEADING_CLOSE).map(|close| from + close)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let index = self.index;
        let offset = *self.opens.get(index)?;
        self.index += 1;

        let after_open = offset + HEADING_OPEN.len();
        let end = self.opens.get(index + 1).copied().unwrap_or(text.len());

        let section = match self.find_close(after_open, end) {
            Some(close) => Section::Heading {
                index,
                offset,
                identifier: &text[after_open..close],
                body: &text[close + HEADING_CLOSE.len()..end],
            },
            None => Section::Malformed {
                index,
                offset,
                span: &text[offset..end],
            },
        };
        Some(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<Section<'_>> {
        Scanner::new(text).collect()
    }

    #[test]
    fn test_empty_and_headingless() {
        assert!(collect("").is_empty());
        assert!(collect("no headings here, just **bold** text").is_empty());
        assert!(collect("**topic 1** lowercase is not a heading").is_empty());
    }

    #[test]
    fn test_two_headings() {
        let sections = collect("**Topic 1: Mars**content A**Topic 2: Venus**content B");
        assert_eq!(
            sections,
            vec![
                Section::Heading {
                    index: 0,
                    offset: 0,
                    identifier: " 1: Mars",
                    body: "content A",
                },
                Section::Heading {
                    index: 1,
                    offset: 26,
                    identifier: " 2: Venus",
                    body: "content B",
                },
            ]
        );
    }

    #[test]
    fn test_preamble_ignored() {
        let sections = collect("Here are your topics:\n\n**Topic 1: Rust**\nMemory safety.");
        assert_eq!(sections.len(), 1);
        assert!(matches!(
            sections[0],
            Section::Heading { offset: 23, body: "\nMemory safety.", .. }
        ));
    }

    #[test]
    fn test_body_keeps_inline_bold() {
        let sections = collect("**Topic 1: Art**\nThe **Baroque** period.");
        assert!(matches!(
            sections[0],
            Section::Heading { body: "\nThe **Baroque** period.", .. }
        ));
    }

    #[test]
    fn test_unclosed_heading_at_end() {
        let sections = collect("**Topic 1: Mars**ok**Topic 2: no close");
        assert_eq!(sections.len(), 2);
        assert!(matches!(sections[0], Section::Heading { body: "ok", .. }));
        assert_eq!(
            sections[1],
            Section::Malformed {
                index: 1,
                offset: 19,
                span: "**Topic 2: no close",
            }
        );
    }

    #[test]
    fn test_unclosed_heading_before_next() {
        let text = "**Topic 1: Mars\nred planet\n**Topic 2: Venus**hot";
        let sections = collect(text);
        assert_eq!(sections.len(), 2);
        assert!(matches!(
            sections[0],
            Section::Malformed { index: 0, offset: 0, span: "**Topic 1: Mars\nred planet\n" }
        ));
        assert!(matches!(
            sections[1],
            Section::Heading { index: 1, identifier: " 2: Venus", body: "hot", .. }
        ));
    }

    #[test]
    fn test_close_that_opens_next_heading_is_malformed() {
        let sections = collect("**Topic 1 **Topic 2**body");
        assert_eq!(sections.len(), 2);
        assert!(matches!(sections[0], Section::Malformed { .. }));
        assert!(matches!(
            sections[1],
            Section::Heading { identifier: " 2", body: "body", .. }
        ));
    }

    #[test]
    fn test_close_overlapping_next_opening_is_malformed() {
        let sections = collect("**Topic 1: A***Topic 2: B**body");
        assert_eq!(
            sections,
            vec![
                Section::Malformed {
                    index: 0,
                    offset: 0,
                    span: "**Topic 1: A*",
                },
                Section::Heading {
                    index: 1,
                    offset: 13,
                    identifier: " 2: B",
                    body: "body",
                },
            ]
        );
    }

    #[test]
    fn test_every_opening_token_yields_a_section() {
        let text = "**Topic 1**a***Topic 2**b****Topic 3**c";
        let offsets: Vec<usize> = collect(text).iter().map(Section::offset).collect();
        let expected: Vec<usize> = text.match_indices(HEADING_OPEN).map(|(i, _)| i).collect();
        assert_eq!(offsets, expected);
    }

    #[test]
    fn test_bare_topic_heading() {
        let sections = collect("**Topic**body");
        assert!(matches!(
            sections[0],
            Section::Heading { identifier: "", body: "body", .. }
        ));
    }

    #[test]
    fn test_section_accessors() {
        let sections = collect("x**Topic 1**a**Topic 2");
        assert_eq!(sections[0].index(), 0);
        assert_eq!(sections[0].offset(), 1);
        assert_eq!(sections[1].index(), 1);
        assert_eq!(sections[1].offset(), 13);
    }
}
