//! Low-level errors carrying a source position.
//!
//! This is the error type used *inside* individual passes (lexing, arena
//! bookkeeping). Pass-level diagnostics with notes and severities live in
//! `fs_compile::diagnostic`; this type is what gets wrapped into those.

use crate::span::Span;
use std::fmt;

/// An error annotated with the source location it occurred at.
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub message: String,
    pub span: Span,
}

impl SpannedError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for SpannedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for SpannedError {}

/// Alias for `std::result::Result<T, SpannedError>`.
pub type Result<T> = std::result::Result<T, SpannedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message_and_range() {
        let err = SpannedError::new("unexpected token", Span::new(5, 10));
        let text = err.to_string();
        assert!(text.contains("unexpected token"));
        assert!(text.contains("5..10"));
    }
}
