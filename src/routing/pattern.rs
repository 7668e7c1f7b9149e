//! Route pattern and request path parsing.
//!
//! # Responsibilities
//! - Split a pattern or path on `/`, dropping empty tokens
//! - Stop after the first `*` segment (a wildcard is always last)
//! - Classify pattern tokens once into typed segments
//!
//! # Design Decisions
//! - No case normalization, no percent-decoding
//! - Request paths stay as borrowed `&str` tokens; only registered
//!   patterns are classified

use std::fmt;

/// One classified token of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// `:name`, captures one request segment.
    Param(String),
    /// `*name`, captures every remaining request segment.
    Wildcard(String),
}

impl Segment {
    /// Classify a raw, non-empty token by its first character.
    pub fn classify(token: &str) -> Self {
        if let Some(name) = token.strip_prefix(':') {
            Segment::Param(name.to_string())
        } else if let Some(name) = token.strip_prefix('*') {
            Segment::Wildcard(name.to_string())
        } else {
            Segment::Literal(token.to_string())
        }
    }

    /// True for `:name` and `*name` segments.
    pub fn is_wild(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }

    /// True only for `*name` segments.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::Wildcard(_))
    }

    /// The token as it appeared in the pattern, marker included.
    pub fn as_raw(&self) -> String {
        self.to_string()
    }

    /// Whether a raw token carries exactly this segment's text.
    pub(crate) fn raw_eq(&self, token: &str) -> bool {
        match self {
            Segment::Literal(text) => text == token,
            Segment::Param(name) => token.strip_prefix(':') == Some(name.as_str()),
            Segment::Wildcard(name) => token.strip_prefix('*') == Some(name.as_str()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::Wildcard(name) => write!(f, "*{}", name),
        }
    }
}

/// Split a pattern or request path into its non-empty tokens.
///
/// Scanning stops right after the first token that starts with `*`.
pub fn split_segments(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for token in path.split('/').filter(|t| !t.is_empty()) {
        parts.push(token);
        if token.starts_with('*') {
            break;
        }
    }
    parts
}

/// Parse a route pattern into classified segments.
pub fn parse_pattern(pattern: &str) -> Vec<Segment> {
    split_segments(pattern)
        .into_iter()
        .map(Segment::classify)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_collapses_slashes() {
        assert_eq!(split_segments("//p///go/doc/"), vec!["p", "go", "doc"]);
        assert!(split_segments("").is_empty());
        assert!(split_segments("/").is_empty());
    }

    #[test]
    fn test_split_stops_after_wildcard() {
        assert_eq!(
            split_segments("/static/*filepath/ignored/too"),
            vec!["static", "*filepath"]
        );
        // Request paths go through the same truncation.
        assert_eq!(split_segments("/a/*/b"), vec!["a", "*"]);
    }

    #[test]
    fn test_parse_classifies_once() {
        let segments = parse_pattern("/p/:lang/*rest");
        assert_eq!(
            segments,
            vec![
                Segment::Literal("p".into()),
                Segment::Param("lang".into()),
                Segment::Wildcard("rest".into()),
            ]
        );
        assert!(!segments[0].is_wild());
        assert!(segments[1].is_wild() && !segments[1].is_catch_all());
        assert!(segments[2].is_catch_all());
    }

    #[test]
    fn test_raw_round_trip() {
        for token in ["doc", ":lang", "*filepath", ":", "*"] {
            let segment = Segment::classify(token);
            assert_eq!(segment.as_raw(), token);
            assert!(segment.raw_eq(token));
        }
        assert!(!Segment::Literal("lang".into()).raw_eq(":lang"));
        assert!(!Segment::Param("lang".into()).raw_eq("lang"));
    }

    #[test]
    fn test_no_case_folding() {
        assert_eq!(
            parse_pattern("/API/Users"),
            vec![
                Segment::Literal("API".into()),
                Segment::Literal("Users".into()),
            ]
        );
    }
}
