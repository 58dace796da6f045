/// One row of a workflow's rule table, as supplied by an external loader.
///
/// `level` 1 rules route keywords into buckets; higher levels refine the
/// previous level's output. Rules at level 2 and above must name the sheet
/// they emit into; rules at level 4 and above must name the parent rule
/// whose matched subset they are scoped to. [`Workflow::new`](crate::Workflow::new)
/// enforces these shape requirements before any classification runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRule {
    /// Stage this rule runs in, starting at 1.
    pub level: u32,
    /// Grouping label from the rule source (e.g. the worksheet it came from).
    pub source: String,
    /// Rule text, or [`MATCH_ALL`](crate::MATCH_ALL) to pass a whole slice through.
    pub rule: String,
    /// Output bucket the matched keywords are routed to.
    pub bucket: String,
    /// Sub-partition within the bucket; required from level 2 upward.
    pub sheet: Option<String>,
    /// Previous-level rule this rule is scoped to; required from level 4 upward.
    pub parent: Option<String>,
}

impl WorkflowRule {
    /// Shorthand for a level 1 rule, which needs neither sheet nor parent.
    #[must_use]
    pub fn top(source: &str, rule: &str, bucket: &str) -> Self {
        Self {
            level: 1,
            source: source.to_owned(),
            rule: rule.to_owned(),
            bucket: bucket.to_owned(),
            sheet: None,
            parent: None,
        }
    }

    /// Shorthand for a level ≥2 rule emitting into a named sheet.
    #[must_use]
    pub fn staged(level: u32, source: &str, rule: &str, bucket: &str, sheet: &str) -> Self {
        Self {
            level,
            source: source.to_owned(),
            rule: rule.to_owned(),
            bucket: bucket.to_owned(),
            sheet: Some(sheet.to_owned()),
            parent: None,
        }
    }

    /// Scope this rule to the matched subset of a previous-level rule.
    #[must_use]
    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_owned());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_has_no_sheet_or_parent() {
        let rule = WorkflowRule::top("Sheet1", "英语", "英语");
        assert_eq!(rule.level, 1);
        assert_eq!(rule.sheet, None);
        assert_eq!(rule.parent, None);
    }

    #[test]
    fn staged_with_parent() {
        let rule = WorkflowRule::staged(4, "Sheet4", "口语", "英语", "口语类").with_parent("雅思");
        assert_eq!(rule.level, 4);
        assert_eq!(rule.sheet.as_deref(), Some("口语类"));
        assert_eq!(rule.parent.as_deref(), Some("雅思"));
    }
}
