//! Error types and reporting

use crate::ast::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Compile error
#[derive(Debug, Error)]
pub enum CompileError {
    /// Malformed input from the resolver or type system
    #[error("Codegen error at {span:?}: {message}")]
    Codegen { message: String, span: Span },

    /// Internal-consistency violation (e.g. unbalanced inline activations).
    /// The generator driving this crate is out of sync with the nesting
    /// discipline; processing of the current unit must stop.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CompileError {
    pub fn codegen(message: impl Into<String>, span: Span) -> Self {
        Self::Codegen {
            message: message.into(),
            span,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Codegen { span, .. } => Some(*span),
            Self::Internal { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Codegen { message, .. } => message,
            Self::Internal { message } => message,
        }
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &CompileError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        CompileError::Codegen { .. } => "Codegen",
        CompileError::Internal { .. } => "Internal",
    };

    if let Some(span) = error.span() {
        Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {}", error.message()))
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}
