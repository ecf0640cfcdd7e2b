//! Malformed-section policies.
//!
//! A section is malformed when its `**Topic` opening token has no closing
//! `**` on the same line. The policy decides whether such a section is
//! dropped or aborts the parse.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a heading that never closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Drop the section, note it in the report, keep going.
    #[default]
    Skip,
    /// Fail the whole parse on the first malformed section.
    Strict,
}

impl MalformedPolicy {
    /// Returns the canonical policy name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Strict => "strict",
        }
    }

    /// Returns true for the lenient policy.
    #[must_use]
    pub const fn is_lenient(self) -> bool {
        matches!(self, Self::Skip)
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MalformedPolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" | "lenient" => Ok(Self::Skip),
            "strict" => Ok(Self::Strict),
            _ => Err(ParseError::UnknownPolicy {
                name: s.to_string(),
            }),
        }
    }
}

/// Lists available policy names.
#[must_use]
pub fn available_policies() -> Vec<&'static str> {
    vec!["skip", "strict"]
}
