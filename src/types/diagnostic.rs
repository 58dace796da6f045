use std::fmt;

use crate::parse::RuleSyntaxError;

/// A non-fatal event observed during normalization, rule compilation, or
/// classification. Advisory only: emitting (or dropping) these never changes
/// the outcome of the call that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Invisible format characters were stripped from an input string.
    InvisibleCharsRemoved {
        before: String,
        after: String,
        removed: usize,
    },
    /// One rule string failed to parse and was excluded from its set.
    RuleSyntax(RuleSyntaxError),
    /// One (rule, keyword) evaluation failed and was treated as no-match.
    EvaluationFailed { rule: String, keyword: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvisibleCharsRemoved {
                before,
                after,
                removed,
            } => write!(
                f,
                "removed {removed} invisible character(s): '{before}' -> '{after}'"
            ),
            Diagnostic::RuleSyntax(err) => write!(f, "{err}"),
            Diagnostic::EvaluationFailed { rule, keyword } => {
                write!(f, "evaluating rule '{rule}' against '{keyword}' failed")
            }
        }
    }
}

/// Receiver for [`Diagnostic`] events.
///
/// Implementations must be `Sync`: the parallel classification path reports
/// from worker threads. Any `Fn(&Diagnostic) + Sync` closure works.
pub trait DiagnosticSink: Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F: Fn(&Diagnostic) + Sync> DiagnosticSink for F {
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic);
    }
}

/// Sink that discards every event, for callers that don't observe
/// diagnostics. Behavior is identical either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}
