//! User-visible diagnostics
//!
//! Unlike [`crate::error::CompileError`], diagnostics never abort a
//! compilation unit: they are collected through a [`DiagnosticSink`] and
//! surfaced to the user after codegen completes. The only producer in the
//! backend core today is the inline cycle reporter.

use crate::ast::Span;

/// Kinds of backend diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A chain of inline expansions re-entered a function already being
    /// expanded; the offending call is compiled without inlining.
    InlineCycle,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InlineCycle => "inline_cycle",
        }
    }
}

/// A user-visible warning produced during code generation
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn inline_cycle(span: Span, function: &str) -> Self {
        Self {
            kind: DiagnosticKind::InlineCycle,
            span,
            message: format!(
                "inline function '{function}' is called recursively; this call is compiled without inlining"
            ),
        }
    }
}

/// Reporting channel for non-fatal diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Sink that collects diagnostics in order of arrival
#[derive(Debug, Default)]
pub struct DiagnosticList {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Count diagnostics of one kind
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}

impl DiagnosticSink for DiagnosticList {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Report a diagnostic with ariadne
pub fn report_diagnostic(filename: &str, source: &str, diagnostic: &Diagnostic) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = diagnostic.span;
    Report::build(ReportKind::Warning, (filename, span.start..span.end))
        .with_message(diagnostic.kind.as_str())
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_message(&diagnostic.message)
                .with_color(Color::Yellow),
        )
        .finish()
        .print((filename, Source::from(source)))
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_collects_in_order() {
        let mut list = DiagnosticList::new();
        assert!(list.is_empty());
        list.report(Diagnostic::inline_cycle(Span::new(0, 3), "f"));
        list.report(Diagnostic::inline_cycle(Span::new(5, 9), "g"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.count_of(DiagnosticKind::InlineCycle), 2);
        let spans: Vec<Span> = list.iter().map(|d| d.span).collect();
        assert_eq!(spans, vec![Span::new(0, 3), Span::new(5, 9)]);
    }

    #[test]
    fn test_cycle_message_names_function() {
        let diag = Diagnostic::inline_cycle(Span::new(0, 0), "fact");
        assert!(diag.message.contains("'fact'"));
        assert_eq!(diag.kind, DiagnosticKind::InlineCycle);
    }
}
