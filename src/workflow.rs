use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::classify::classify_one;
use crate::compile::Predicate;
use crate::normalize;
use crate::parse::{parse_rule, RuleSyntaxError};
use crate::types::CompiledRule;
use crate::{
    ClassifiedKeyword, ClassifiedResult, Diagnostic, DiagnosticSink, KeysieveError, Keywords,
    RuleSetBuilder, UnmatchedKeyword, WorkflowRule, WorkflowValidationError,
};

/// Rule value that matches an entire slice without invoking the parser.
/// As a parent reference it means "any parent".
pub const MATCH_ALL: &str = "全";

/// Reserved bucket name for keywords no level 1 rule matched.
pub const UNMATCHED: &str = "unmatched";

/// A validated multi-level classification workflow.
///
/// Level 1 routes the full keyword collection into buckets; every further
/// level re-classifies the previous level's matched slices, scoped by bucket
/// and (from level 4) by parent rule. Validation happens once in
/// [`new`](Self::new); a workflow that constructs will run to completion,
/// recovering per-rule and per-evaluation failures along the way.
#[derive(Debug, Clone)]
pub struct Workflow {
    rules: Vec<WorkflowRule>,
    max_level: u32,
    case_sensitive: bool,
    parallel: bool,
}

impl Workflow {
    /// Normalize the rule texts and validate the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowValidationError`] on any structural violation:
    /// no rules, no level 1, a level gap, a missing sheet (level ≥2) or
    /// parent (level ≥4), a duplicate `(bucket, rule, sheet)` triple, a
    /// bucket unknown to level 1, or a parent that does not exist at the
    /// previous level. No classification work happens on failure.
    pub fn new(
        mut rules: Vec<WorkflowRule>,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, WorkflowValidationError> {
        for rule in &mut rules {
            rule.rule = normalize::clean(&rule.rule, sink);
            if let Some(parent) = rule.parent.take() {
                rule.parent = Some(normalize::clean(&parent, sink));
            }
        }
        validate(&rules)?;
        let max_level = rules.iter().map(|r| r.level).max().unwrap_or(1);
        Ok(Self {
            rules,
            max_level,
            case_sensitive: false,
            parallel: false,
        })
    }

    /// Fix the rule sets built by this workflow to case-sensitive matching.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Classify each level's full-collection pass on worker threads.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Highest level any rule declares.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Build the keyword collection and run. Convenience over
    /// [`Keywords::new`] + [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyKeywords`](crate::InputError::EmptyKeywords)
    /// if nothing survives keyword normalization.
    pub fn process<I, S>(
        &self,
        raw_keywords: I,
        sink: &dyn DiagnosticSink,
    ) -> Result<WorkflowReport, KeysieveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = Keywords::new(raw_keywords, sink)?;
        Ok(self.run(&keywords, sink))
    }

    /// Run every level and collect the matched and unmatched records.
    ///
    /// Per-rule syntax errors and per-evaluation failures are recovered
    /// locally: they are reported through the sink, aggregated on the
    /// report, and never abort a level.
    pub fn run(&self, keywords: &Keywords, sink: &dyn DiagnosticSink) -> WorkflowReport {
        let mut result = ClassifiedResult::default();
        let mut syntax_errors = Vec::new();

        // Level 1: the full collection against every level 1 rule.
        let level1: Vec<&WorkflowRule> = self.rules.iter().filter(|r| r.level == 1).collect();
        let texts: Vec<&str> = level1.iter().map(|r| r.rule.as_str()).collect();
        let (ruleset, mut errors) = RuleSetBuilder::new()
            .case_sensitive(self.case_sensitive)
            .compile(&texts, sink)
            .expect("level 1 rules are non-empty after validation");
        syntax_errors.append(&mut errors);

        let classifications = if self.parallel {
            ruleset.classify_parallel(keywords, None, sink)
        } else {
            ruleset.classify(keywords, sink)
        };

        // Matched slices carried to the next level, keyed by the rule that
        // produced them.
        let mut slices: BTreeMap<(String, String), Vec<String>> = BTreeMap::new();

        for classification in &classifications {
            if !classification.is_matched() {
                result.push_unmatched(UnmatchedKeyword {
                    keyword: classification.keyword().to_owned(),
                    bucket: UNMATCHED.to_owned(),
                    sheet: None,
                    level: 1,
                });
                continue;
            }
            for text in classification.matched() {
                for rule in level1.iter().filter(|r| r.rule == *text) {
                    result.push_classified(ClassifiedKeyword {
                        level: 1,
                        keyword: classification.keyword().to_owned(),
                        rule: text.clone(),
                        bucket: rule.bucket.clone(),
                        sheet: rule.sheet.clone(),
                        parent: None,
                    });
                    slices
                        .entry((rule.bucket.clone(), text.clone()))
                        .or_default()
                        .push(classification.keyword().to_owned());
                }
            }
        }
        for slice in slices.values_mut() {
            dedup_preserving_order(slice);
        }

        for level in 2..=self.max_level {
            let level_rules: Vec<&WorkflowRule> =
                self.rules.iter().filter(|r| r.level == level).collect();

            // Parse each distinct rule text once per level; failures exclude
            // the rule everywhere it would have applied.
            let mut predicates: HashMap<&str, Predicate> = HashMap::new();
            let mut failed: HashSet<&str> = HashSet::new();
            for rule in &level_rules {
                let text = rule.rule.as_str();
                if predicates.contains_key(text) || failed.contains(text) {
                    continue;
                }
                if text == MATCH_ALL {
                    predicates.insert(text, Predicate::match_all());
                    continue;
                }
                match parse_rule(text) {
                    Ok(expr) => {
                        predicates.insert(text, Predicate::compile(&expr, self.case_sensitive));
                    }
                    Err(err) => {
                        sink.report(&Diagnostic::RuleSyntax(err.clone()));
                        syntax_errors.push(err);
                        failed.insert(text);
                    }
                }
            }

            let mut next_slices: BTreeMap<(String, String), Vec<String>> = BTreeMap::new();

            for ((bucket, parent_text), slice_keywords) in &slices {
                let applicable: Vec<&WorkflowRule> = level_rules
                    .iter()
                    .filter(|r| {
                        r.bucket == *bucket
                            && r.parent
                                .as_deref()
                                .map_or(true, |p| p == MATCH_ALL || p == parent_text.as_str())
                    })
                    .copied()
                    .collect();
                // A slice no rule targets at this level passes out of the
                // workflow untouched; only targeted slices record unmatched
                // sets.
                if applicable.is_empty() {
                    continue;
                }

                let mut slice_rules: Vec<CompiledRule> = Vec::new();
                let mut seen_texts: HashSet<&str> = HashSet::new();
                for rule in &applicable {
                    if seen_texts.insert(rule.rule.as_str()) {
                        if let Some(predicate) = predicates.get(rule.rule.as_str()) {
                            slice_rules
                                .push(CompiledRule::new(rule.rule.clone(), predicate.clone()));
                        }
                    }
                }

                let mut matched_here: HashSet<&str> = HashSet::new();
                for keyword in slice_keywords {
                    let classification = classify_one(&slice_rules, keyword, sink);
                    for text in classification.matched() {
                        matched_here.insert(keyword.as_str());
                        for rule in applicable.iter().filter(|r| r.rule == *text) {
                            result.push_classified(ClassifiedKeyword {
                                level,
                                keyword: keyword.clone(),
                                rule: text.clone(),
                                bucket: bucket.clone(),
                                sheet: rule.sheet.clone(),
                                parent: Some(parent_text.clone()),
                            });
                        }
                        next_slices
                            .entry((bucket.clone(), text.clone()))
                            .or_default()
                            .push(keyword.clone());
                    }
                }
                for keyword in slice_keywords {
                    if !matched_here.contains(keyword.as_str()) {
                        result.push_unmatched(UnmatchedKeyword {
                            keyword: keyword.clone(),
                            bucket: bucket.clone(),
                            sheet: None,
                            level,
                        });
                    }
                }
            }

            slices = next_slices;
            for slice in slices.values_mut() {
                dedup_preserving_order(slice);
            }
        }

        WorkflowReport {
            result,
            syntax_errors,
            levels: self.max_level,
        }
    }
}

fn validate(rules: &[WorkflowRule]) -> Result<(), WorkflowValidationError> {
    if rules.is_empty() {
        return Err(WorkflowValidationError::NoRules);
    }
    if let Some(rule) = rules.iter().find(|r| r.level == 0) {
        return Err(WorkflowValidationError::InvalidLevel {
            rule: rule.rule.clone(),
        });
    }

    let levels: BTreeSet<u32> = rules.iter().map(|r| r.level).collect();
    if !levels.contains(&1) {
        return Err(WorkflowValidationError::MissingLevelOne);
    }
    let max = *levels.iter().next_back().expect("levels is non-empty");
    for level in 1..=max {
        if !levels.contains(&level) {
            return Err(WorkflowValidationError::NonContiguousLevels { missing: level });
        }
    }

    let mut seen = HashSet::new();
    for rule in rules {
        if rule.level >= 2 && rule.sheet.is_none() {
            return Err(WorkflowValidationError::MissingSheet {
                rule: rule.rule.clone(),
                level: rule.level,
            });
        }
        if rule.level >= 4 && rule.parent.is_none() {
            return Err(WorkflowValidationError::MissingParent {
                rule: rule.rule.clone(),
                level: rule.level,
            });
        }
        if !seen.insert((&rule.bucket, &rule.rule, &rule.sheet)) {
            return Err(WorkflowValidationError::DuplicateRule {
                bucket: rule.bucket.clone(),
                rule: rule.rule.clone(),
                sheet: rule.sheet.clone(),
            });
        }
    }

    let level1_buckets: HashSet<&str> = rules
        .iter()
        .filter(|r| r.level == 1)
        .map(|r| r.bucket.as_str())
        .collect();
    for rule in rules.iter().filter(|r| r.level >= 2) {
        if !level1_buckets.contains(rule.bucket.as_str()) {
            return Err(WorkflowValidationError::UnknownBucket {
                rule: rule.rule.clone(),
                bucket: rule.bucket.clone(),
                level: rule.level,
            });
        }
    }

    for rule in rules {
        let Some(parent) = rule.parent.as_deref() else {
            continue;
        };
        if parent == MATCH_ALL {
            continue;
        }
        let exists = rules.iter().any(|candidate| {
            candidate.level + 1 == rule.level
                && candidate.bucket == rule.bucket
                && candidate.rule == parent
        });
        if !exists {
            return Err(WorkflowValidationError::UnknownParent {
                rule: rule.rule.clone(),
                parent: parent.to_owned(),
                level: rule.level,
            });
        }
    }

    Ok(())
}

fn dedup_preserving_order(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

/// Everything a workflow run produced: the records across all levels plus
/// the per-rule syntax errors recovered along the way.
#[derive(Debug, Clone)]
#[must_use]
pub struct WorkflowReport {
    result: ClassifiedResult,
    syntax_errors: Vec<RuleSyntaxError>,
    levels: u32,
}

impl WorkflowReport {
    #[must_use]
    pub fn result(&self) -> &ClassifiedResult {
        &self.result
    }

    #[must_use]
    pub fn syntax_errors(&self) -> &[RuleSyntaxError] {
        &self.syntax_errors
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.syntax_errors.len()
    }

    /// Number of levels the workflow declares (and ran).
    #[must_use]
    pub fn levels(&self) -> u32 {
        self.levels
    }
}

impl fmt::Display for WorkflowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} classified, {} unmatched, {} rule error(s) across {} level(s)",
            self.result.classified().len(),
            self.result.unmatched().len(),
            self.syntax_errors.len(),
            self.levels,
        )
    }
}
