use thiserror::Error;

/// A single rule string that violated the grammar.
///
/// Scoped to one rule: the surrounding rule set keeps compiling the
/// remaining rules and collects these instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule '{rule}' failed to parse: {reason}")]
pub struct RuleSyntaxError {
    /// The offending rule text, after normalization.
    pub rule: String,
    /// Human-readable reason for the failure.
    pub reason: String,
}

impl RuleSyntaxError {
    pub(crate) fn new(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}
