//! Error types and reporting

use crate::ast::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Compile error
///
/// The span-carrying variants are structural precondition violations: the
/// annotated AST broke a contract the front end is supposed to uphold.
/// Lowering stops at the first one and produces no output.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid lvalue at {span}: {message}")]
    InvalidLvalue { message: String, span: Span },

    #[error("`break` outside of a loop at {span}")]
    BreakOutsideLoop { span: Span },

    #[error("`continue` outside of a loop at {span}")]
    ContinueOutsideLoop { span: Span },

    #[error("for statement at {span} has both an expression and a declaration initializer")]
    ConflictingForInit { span: Span },

    #[error("symbol `{name}` is bound to storage twice (at {span})")]
    SymbolRebound { name: String, span: Span },

    #[error("symbol `{name}` is used before any storage was bound to it (at {span})")]
    UnboundSymbol { name: String, span: Span },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("cannot decode AST: {message}")]
    Decode { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("IR verification failed in `{function}`: {message}")]
    Verify { function: String, message: String },
}

impl CompileError {
    pub fn invalid_lvalue(message: impl Into<String>, span: Span) -> Self {
        Self::InvalidLvalue {
            message: message.into(),
            span,
        }
    }

    pub fn symbol_rebound(name: impl Into<String>, span: Span) -> Self {
        Self::SymbolRebound {
            name: name.into(),
            span,
        }
    }

    pub fn unbound_symbol(name: impl Into<String>, span: Span) -> Self {
        Self::UnboundSymbol {
            name: name.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn verify(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Verify {
            function: function.into(),
            message: message.into(),
        }
    }

    /// True for errors that signal an upstream contract breach
    pub fn is_precondition_violation(&self) -> bool {
        self.span().is_some()
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::InvalidLvalue { span, .. }
            | Self::BreakOutsideLoop { span }
            | Self::ContinueOutsideLoop { span }
            | Self::ConflictingForInit { span }
            | Self::SymbolRebound { span, .. }
            | Self::UnboundSymbol { span, .. } => Some(*span),
            Self::Io { .. } | Self::Decode { .. } | Self::Config { .. } | Self::Verify { .. } => None,
        }
    }

    fn kind(&self) -> &'static str {
        if self.is_precondition_violation() {
            "Lowering"
        } else {
            match self {
                Self::Io { .. } => "IO",
                Self::Decode { .. } => "Decode",
                Self::Config { .. } => "Config",
                _ => "Verify",
            }
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &CompileError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = error.kind();
    let message = error.to_string();

    let report = match error.span().map(std::ops::Range::from) {
        Some(range) => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, range))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish(),
        None => Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {message}"))
            .finish(),
    };

    if let Err(e) = report.eprint((filename, Source::from(source))) {
        eprintln!("Error: {message} (could not render report: {e})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        let err = CompileError::BreakOutsideLoop { span: Span::new(4, 9) };
        assert!(err.is_precondition_violation());
        assert_eq!(err.span(), Some(Span::new(4, 9)));

        let err = CompileError::decode("eof");
        assert!(!err.is_precondition_violation());
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = CompileError::invalid_lvalue("array element", Span::new(1, 2));
        assert_eq!(err.to_string(), "invalid lvalue at 1..2: array element");

        let err = CompileError::ConflictingForInit { span: Span::new(0, 3) };
        assert!(err.to_string().contains("both an expression and a declaration"));
    }

    #[test]
    fn test_report_error_renders_both_kinds() {
        let source = "while (1) { }\nbreak;\n";
        report_error("loop.c", source, &CompileError::BreakOutsideLoop { span: Span::new(14, 20) });
        report_error("loop.c", source, &CompileError::decode("unexpected end of input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: CompileError = io.into();
        assert!(matches!(err, CompileError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
