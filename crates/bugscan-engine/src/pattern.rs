use crate::{Error, Result};
use bugscan_types::{Diagnostic, DiagnosticKind};
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// Case-insensitive whole-word matcher built from one pattern line
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile one pattern line.
    ///
    /// The text is a regular expression; it is wrapped in word boundaries so
    /// `panic` matches `Kernel PANIC detected` but not `panicking`. Blank
    /// text is rejected.
    pub fn new(raw: &str) -> Result<Self> {
        let source = raw.trim().to_string();
        if source.is_empty() {
            return Err(Error::EmptyPattern);
        }
        let regex = RegexBuilder::new(&format!(r"\b(?:{})\b", source))
            .case_insensitive(true)
            .build()
            .map_err(|err| Error::Pattern {
                pattern: source.clone(),
                source: err,
            })?;

        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A pattern line that failed to compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPattern {
    pub source: String,
    pub reason: String,
}

/// Ordered collection of patterns; any match counts, the first one wins
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    rejected: Vec<RejectedPattern>,
}

impl PatternSet {
    /// A set that matches nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile every non-blank line. Lines that fail to compile are kept
    /// aside in [`PatternSet::rejected`] and the rest of the set survives.
    pub fn compile<I, S>(raw_lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();

        for line in raw_lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            match Pattern::new(line) {
                Ok(pattern) => set.patterns.push(pattern),
                Err(err) => {
                    let reason = match &err {
                        Error::Pattern { source, .. } => source.to_string(),
                        other => other.to_string(),
                    };
                    tracing::debug!(pattern = line, "skipping invalid pattern");
                    set.rejected.push(RejectedPattern {
                        source: line.to_string(),
                        reason,
                    });
                }
            }
        }

        tracing::debug!(
            accepted = set.patterns.len(),
            rejected = set.rejected.len(),
            "compiled pattern set"
        );
        set
    }

    /// Load and compile a pattern file
    pub fn from_file(path: &Path) -> Result<Self> {
        let lines = crate::load_lines(path)?;
        Ok(Self::compile(lines))
    }

    pub fn matches_any(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// The first pattern, in source order, that matches `text`
    pub fn first_match(&self, text: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.is_match(text))
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn rejected(&self) -> &[RejectedPattern] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Rejected lines as operator diagnostics
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.rejected
            .iter()
            .map(|rejected| {
                Diagnostic::new(DiagnosticKind::Pattern, &rejected.source, &rejected.reason)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_case_insensitive() {
        let set = PatternSet::compile(["panic"]);

        assert!(set.matches_any("Kernel PANIC detected"));
        assert!(set.matches_any("panic"));
        assert!(set.matches_any("fatal: panic!"));
        assert!(!set.matches_any("panicking"));
        assert!(!set.matches_any("nopanic here"));
    }

    #[test]
    fn test_blank_lines_never_produce_patterns() {
        let set = PatternSet::compile(["", "   ", "\t", "OutOfMemory", "  "]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.patterns()[0].as_str(), "OutOfMemory");
    }

    #[test]
    fn test_blank_pattern_is_rejected() {
        assert!(matches!(Pattern::new("   "), Err(Error::EmptyPattern)));
        assert!(matches!(Pattern::new(""), Err(Error::EmptyPattern)));

        let pattern = Pattern::new("  OutOfMemory ").unwrap();
        assert_eq!(pattern.as_str(), "OutOfMemory");
        assert!(!pattern.is_match("all good here"));
    }

    #[test]
    fn test_invalid_pattern_is_skipped_not_fatal() {
        let set = PatternSet::compile(["timeout", "unclosed(group", "refused"]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.rejected().len(), 1);
        assert_eq!(set.rejected()[0].source, "unclosed(group");
        assert!(set.matches_any("connection refused"));

        let diagnostics = set.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Pattern);
    }

    #[test]
    fn test_first_match_follows_source_order() {
        let set = PatternSet::compile(["error", "fatal"]);
        let hit = set.first_match("fatal error in worker").unwrap();
        assert_eq!(hit.as_str(), "error");
        assert!(set.first_match("all good").is_none());
    }

    #[test]
    fn test_alternation_stays_word_bounded() {
        let set = PatternSet::compile(["oom|segfault"]);
        assert!(set.matches_any("process hit OOM"));
        assert!(set.matches_any("segfault at 0x0"));
        assert!(!set.matches_any("roomy"));
        assert!(!set.matches_any("segfaults"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = PatternSet::empty();
        assert!(set.is_empty());
        assert!(!set.matches_any("ERROR everything is on fire"));
    }

    #[test]
    fn test_non_ascii_word_boundaries() {
        let set = PatternSet::compile(["échec"]);
        assert!(set.matches_any("Statut: ÉCHEC critique"));
        assert!(!set.matches_any("échecs"));
    }
}
