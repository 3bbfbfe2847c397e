//! Payoff expression errors with span-based diagnostics.

use std::fmt;

use thiserror::Error;

/// Byte range of a construct in the expression source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First byte of the construct.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a span from byte offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Source text covered by this span, or an empty string when the span does
    /// not fall on character boundaries.
    pub fn fragment(self, source: &str) -> String {
        source
            .get(self.start..self.end.min(source.len()))
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Rejection of a payoff expression.
///
/// Both variants carry the offending source fragment and its span so that a
/// caller can point at the exact construct.
///
/// # Variants
/// - `InvalidExpression`: malformed syntax, wrong argument count, or a value of
///   the wrong kind (a sequence where a number is required)
/// - `UnsafeExpression`: well-formed, but outside the permitted grammar, names
///   or functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayoffError {
    /// Malformed expression.
    #[error("invalid payoff expression: {message} at {span} (`{fragment}`)")]
    InvalidExpression {
        /// What is wrong.
        message: String,
        /// Offending source text.
        fragment: String,
        /// Location in the source.
        span: Span,
    },

    /// Construct outside the permitted grammar.
    #[error("unsafe payoff expression: {reason} at {span} (`{fragment}`)")]
    UnsafeExpression {
        /// Which rule was violated.
        reason: String,
        /// Offending source text.
        fragment: String,
        /// Location in the source.
        span: Span,
    },
}

impl PayoffError {
    /// Creates an `InvalidExpression` error for `span` of `source`.
    pub fn invalid(message: impl Into<String>, source: &str, span: Span) -> Self {
        Self::InvalidExpression {
            message: message.into(),
            fragment: span.fragment(source),
            span,
        }
    }

    /// Creates an `UnsafeExpression` error for `span` of `source`.
    pub fn unsafe_construct(reason: impl Into<String>, source: &str, span: Span) -> Self {
        Self::UnsafeExpression {
            reason: reason.into(),
            fragment: span.fragment(source),
            span,
        }
    }

    /// Location of the offending construct.
    pub fn span(&self) -> Span {
        match self {
            Self::InvalidExpression { span, .. } | Self::UnsafeExpression { span, .. } => *span,
        }
    }

    /// Offending source text.
    pub fn fragment(&self) -> &str {
        match self {
            Self::InvalidExpression { fragment, .. } | Self::UnsafeExpression { fragment, .. } => {
                fragment
            }
        }
    }

    /// Returns `true` for whitelist violations.
    pub fn is_unsafe(&self) -> bool {
        matches!(self, Self::UnsafeExpression { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_fragment() {
        let source = "max(price - 100, 0)";
        assert_eq!(Span::new(4, 9).fragment(source), "price");
        assert_eq!(Span::new(4, 500).fragment(source), "price - 100, 0)");
        assert_eq!(Span::new(30, 40).fragment(source), "");
    }

    #[test]
    fn test_span_union() {
        assert_eq!(Span::new(4, 9).to(Span::new(0, 6)), Span::new(0, 9));
    }

    #[test]
    fn test_error_display_names_construct() {
        let source = "price.__class__";
        let err =
            PayoffError::unsafe_construct("attribute access on `price`", source, Span::new(0, 15));
        let msg = err.to_string();
        assert!(msg.contains("attribute access"), "message: {msg}");
        assert!(msg.contains("`price.__class__`"), "message: {msg}");
        assert!(err.is_unsafe());
        assert_eq!(err.fragment(), "price.__class__");
    }

    #[test]
    fn test_invalid_error_display() {
        let err = PayoffError::invalid("unexpected token", "1 +", Span::new(3, 3));
        assert!(!err.is_unsafe());
        assert_eq!(err.span(), Span::new(3, 3));
        assert!(err.to_string().starts_with("invalid payoff expression"));
    }
}
