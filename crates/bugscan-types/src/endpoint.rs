use serde::{Deserialize, Serialize};
use std::fmt;

/// A service URL to health-check.
///
/// Always non-empty and free of surrounding whitespace. Whether the text is a
/// valid URL is decided by the probe, which reports a bad URL as unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Build an endpoint from one configuration line.
    ///
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Parse every non-blank line, preserving source order.
    pub fn parse_all<I, S>(lines: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| Self::parse(line.as_ref()))
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
