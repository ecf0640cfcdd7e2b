//! Markup sanitization for untrusted model output.
//!
//! Strips `<tag ...>...</tag>` pairs, inner content included, for a fixed
//! denylist of element types. Matching is case-sensitive, non-greedy per tag
//! type, and spans newlines. Passes repeat until no denylisted pair remains,
//! so fragments that reassemble into a new pair after a removal are caught.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Element types removed by [`sanitize`], in the order they are applied.
pub const DENIED_TAGS: [DeniedTag; 5] = [
    DeniedTag::Script,
    DeniedTag::Style,
    DeniedTag::Iframe,
    DeniedTag::Object,
    DeniedTag::Embed,
];

/// An element type whose tag pairs are stripped from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeniedTag {
    /// `<script>`
    Script,
    /// `<style>`
    Style,
    /// `<iframe>`
    Iframe,
    /// `<object>`
    Object,
    /// `<embed>`
    Embed,
}

impl DeniedTag {
    /// Returns the lowercase element name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
            Self::Iframe => "iframe",
            Self::Object => "object",
            Self::Embed => "embed",
        }
    }

    /// Returns the compiled pair pattern for this tag.
    #[allow(clippy::expect_used)]
    fn regex(self) -> &'static Regex {
        macro_rules! static_regex {
            ($name:ident, $tag:literal) => {{
                static $name: OnceLock<Regex> = OnceLock::new();
                $name.get_or_init(|| {
                    Regex::new(concat!(r"(?s)<", $tag, r"(?:\s[^>]*)?>.*?</", $tag, r"\s*>"))
                        .expect("valid regex")
                })
            }};
        }

        match self {
            Self::Script => static_regex!(SCRIPT, "script"),
            Self::Style => static_regex!(STYLE, "style"),
            Self::Iframe => static_regex!(IFRAME, "iframe"),
            Self::Object => static_regex!(OBJECT, "object"),
            Self::Embed => static_regex!(EMBED, "embed"),
        }
    }
}

/// Removes every denylisted tag pair, inner content included.
///
/// Returns the input borrowed and untouched when nothing matches.
///
/// # Examples
///
/// ```
/// use topic_cards::parsing::sanitize;
///
/// assert_eq!(sanitize("<script>alert(1)</script>Hello"), "Hello");
/// assert_eq!(sanitize("<b>kept</b>"), "<b>kept</b>");
/// ```
#[must_use]
pub fn sanitize(input: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(input);

    loop {
        let mut changed = false;
        for tag in DENIED_TAGS {
            let re = tag.regex();
            if re.is_match(&current) {
                current = Cow::Owned(re.replace_all(&current, "").into_owned());
                changed = true;
            }
        }
        if !changed {
            return current;
        }
    }
}

/// Returns true if the input still holds a denylisted tag pair.
#[must_use]
pub fn contains_denied_markup(input: &str) -> bool {
    DENIED_TAGS.iter().any(|tag| tag.regex().is_match(input))
}
