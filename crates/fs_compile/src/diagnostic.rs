//! The compiler's diagnostic surface: a closed set of identifiable problems,
//! each with a severity and a source location, collected into a
//! [`DiagnosticBag`] instead of aborting on the first error. This lets the
//! compiler report every problem in one pass the way a filter author
//! actually wants, rather than stopping at the first broken block.

use fs_base::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Every distinct problem the compiler can report. Kept as a closed enum so
/// downstream tooling (an editor's diagnostics pane, a test harness
/// asserting "this input produces exactly this error") can match on it
/// instead of parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    UndefinedReference,
    DuplicateConstant,
    TypeMismatch,
    ArrayElementTypeMismatch,
    UnknownKeyword,
    WrongOperandCount,
    NoMatchingConstructor,
    InvalidSocketSpec,
    EmptyValueList,
    PriceWithoutAutogenerate,
    AutogenerateWithoutPrice,
    RuthlessModeVisibilitySwap,
    NestedAutogenerate,
    LoneOperatorRequiresOperand,
    ExactMatchOnNonStringProperty,
    SyntaxError,
    CyclicExpansion,
}

impl DiagnosticCode {
    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticCode::RuthlessModeVisibilitySwap => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub origin: Span,
    pub notes: Vec<(String, Span)>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, origin: Span) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            origin,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>, origin: Span) -> Self {
        self.notes.push((note.into(), origin));
        self
    }

    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }
}

/// Wraps a lexer/parser error as a diagnostic, the way every other pass in
/// this crate reports problems.
impl From<fs_base::SpannedError> for Diagnostic {
    fn from(err: fs_base::SpannedError) -> Self {
        Diagnostic::new(DiagnosticCode::SyntaxError, err.message, err.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {} ({}..{})", self.message, self.origin.start, self.origin.end)
    }
}

impl std::error::Error for Diagnostic {}

/// An accumulator for every diagnostic produced during one compilation,
/// rather than bailing out on the first problem.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("diagnostic: {diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: DiagnosticBag) {
        for diagnostic in other.diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
