use std::num::NonZeroUsize;

use crate::compile::Predicate;
use crate::normalize;
use crate::parse::{parse_rule, RuleSyntaxError};
use crate::{Classification, Diagnostic, DiagnosticSink, InputError, Keywords};

/// Builder for constructing a [`RuleSet`].
///
/// Case sensitivity is fixed here, once for the whole set; changing it means
/// building a new set. The default is case-insensitive, with both the rule
/// words and the keywords folded to lowercase before comparison.
///
/// # Example
///
/// ```
/// use keysieve::{NullSink, RuleSetBuilder};
///
/// let (ruleset, errors) = RuleSetBuilder::new()
///     .case_sensitive(true)
///     .compile(["培训<学校|机构>", "[在线]"], &NullSink)
///     .unwrap();
/// assert_eq!(ruleset.len(), 2);
/// assert!(errors.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    case_sensitive: bool,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Normalize, parse, and compile each rule string.
    ///
    /// A rule that fails to parse is excluded from the set, reported through
    /// the sink, and collected into the returned error list; it never aborts
    /// the remaining rules. Duplicate rule text is legal and yields two
    /// independent entries.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyRules`] if `rules` yields no strings at
    /// all. A set where every rule failed to parse is *not* an error: it has
    /// zero entries and a full error list.
    pub fn compile<I, S>(
        self,
        rules: I,
        sink: &dyn DiagnosticSink,
    ) -> Result<(RuleSet, Vec<RuleSyntaxError>), InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        let mut errors = Vec::new();
        let mut saw_input = false;
        for raw in rules {
            saw_input = true;
            let text = normalize::clean(raw.as_ref(), sink);
            match parse_rule(&text) {
                Ok(expr) => compiled.push(CompiledRule {
                    predicate: Predicate::compile(&expr, self.case_sensitive),
                    text,
                }),
                Err(err) => {
                    sink.report(&Diagnostic::RuleSyntax(err.clone()));
                    errors.push(err);
                }
            }
        }
        if !saw_input {
            return Err(InputError::EmptyRules);
        }
        Ok((
            RuleSet {
                rules: compiled,
                case_sensitive: self.case_sensitive,
            },
            errors,
        ))
    }
}

/// One surviving rule: its normalized text and the predicate compiled from it.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub(crate) text: String,
    pub(crate) predicate: Predicate,
}

impl CompiledRule {
    pub(crate) fn new(text: String, predicate: Predicate) -> Self {
        Self { text, predicate }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

/// A compiled, immutable rule set: the ordered `(text, predicate)` pairs that
/// parsed successfully, in their original input order.
///
/// Read-only during classification, so it can be shared across worker
/// threads without locking.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<CompiledRule>,
    case_sensitive: bool,
}

impl RuleSet {
    /// Compile with default options (case-insensitive). Convenience for
    /// [`RuleSetBuilder::compile`].
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyRules`] if `rules` yields no strings.
    pub fn compile<I, S>(
        rules: I,
        sink: &dyn DiagnosticSink,
    ) -> Result<(Self, Vec<RuleSyntaxError>), InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RuleSetBuilder::new().compile(rules, sink)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// The surviving `(rule text, predicate)` pairs, in input order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.rules.iter().map(|r| (r.text.as_str(), &r.predicate))
    }

    /// Classify every keyword against this set, preserving keyword order.
    /// Each result lists the matched rule texts in the set's order.
    #[must_use]
    pub fn classify(&self, keywords: &Keywords, sink: &dyn DiagnosticSink) -> Vec<Classification> {
        crate::classify::classify(&self.rules, keywords, sink)
    }

    /// Like [`classify`](Self::classify), but splits the keywords into
    /// contiguous batches evaluated on worker threads.
    ///
    /// The worker count is capped by `workers` (when given), the machine's
    /// available parallelism, and the keyword count; small inputs fall back
    /// to the sequential path. Output is identical to [`classify`](Self::classify)
    /// for every partitioning.
    #[must_use]
    pub fn classify_parallel(
        &self,
        keywords: &Keywords,
        workers: Option<NonZeroUsize>,
        sink: &dyn DiagnosticSink,
    ) -> Vec<Classification> {
        crate::classify::classify_parallel(&self.rules, keywords, workers, sink)
    }
}
