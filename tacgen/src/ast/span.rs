//! Source positions carried by AST nodes

use serde::{Deserialize, Serialize};

/// Byte range into the source the front end parsed. Lowering never reads
/// the source itself; spans only travel into diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Statement node with its position; JSON input may omit the span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    #[serde(default)]
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Wrap a node built in code rather than decoded from a parse
    pub fn synthetic(node: T) -> Self {
        Self {
            node,
            span: Span::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(42, 99)), "42..99");
    }

    #[test]
    fn test_span_as_report_range() {
        let range: std::ops::Range<usize> = Span::new(5, 15).into();
        assert_eq!(range, 5..15);
    }

    #[test]
    fn test_missing_span_decodes_as_default() {
        let s: Spanned<i32> = serde_json::from_str(r#"{ "node": 7 }"#).unwrap();
        assert_eq!(s, Spanned::synthetic(7));

        let s: Spanned<i32> = serde_json::from_str(r#"{ "node": 7, "span": { "start": 2, "end": 4 } }"#).unwrap();
        assert_eq!(s.span, Span::new(2, 4));
    }
}
