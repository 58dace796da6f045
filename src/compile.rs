use crate::Expr;

/// Lowered expression with grouping dissolved and, for case-insensitive
/// sets, every pattern word folded to lowercase at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompiledExpr {
    Term(String),
    Exact(String),
    TermExclude(String, Box<CompiledExpr>),
    And(Box<CompiledExpr>, Box<CompiledExpr>),
    Or(Box<CompiledExpr>, Box<CompiledExpr>),
    /// Matches every keyword. Never produced by the parser; only built by
    /// [`Predicate::match_all`] for workflow pass-through rules.
    Always,
}

/// A compiled, pure boolean function over a keyword string.
///
/// Owned by exactly one rule-set entry; evaluation reads no shared state and
/// is total for any expression the parser accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    root: CompiledExpr,
    fold_case: bool,
}

impl Predicate {
    /// Lower an AST into an executable predicate. Case sensitivity is fixed
    /// here, once per rule set; changing it requires recompiling.
    #[must_use]
    pub(crate) fn compile(expr: &Expr, case_sensitive: bool) -> Self {
        Self {
            root: lower(expr, !case_sensitive),
            fold_case: !case_sensitive,
        }
    }

    /// The predicate that matches every keyword, bypassing the parser.
    #[must_use]
    pub(crate) fn match_all() -> Self {
        Self {
            root: CompiledExpr::Always,
            fold_case: false,
        }
    }

    /// Evaluate this predicate against a keyword.
    #[must_use]
    pub fn matches(&self, keyword: &str) -> bool {
        if self.fold_case {
            eval(&self.root, &keyword.to_lowercase())
        } else {
            eval(&self.root, keyword)
        }
    }
}

fn lower(expr: &Expr, fold_case: bool) -> CompiledExpr {
    let fold = |w: &str| {
        if fold_case {
            w.to_lowercase()
        } else {
            w.to_owned()
        }
    };
    match expr {
        Expr::Term(w) => CompiledExpr::Term(fold(w)),
        Expr::Exact(w) => CompiledExpr::Exact(fold(w)),
        Expr::TermExclude(w, inner) => {
            CompiledExpr::TermExclude(fold(w), Box::new(lower(inner, fold_case)))
        }
        Expr::And(a, b) => {
            CompiledExpr::And(Box::new(lower(a, fold_case)), Box::new(lower(b, fold_case)))
        }
        Expr::Or(a, b) => {
            CompiledExpr::Or(Box::new(lower(a, fold_case)), Box::new(lower(b, fold_case)))
        }
        Expr::Group(inner) => lower(inner, fold_case),
    }
}

fn eval(expr: &CompiledExpr, keyword: &str) -> bool {
    match expr {
        CompiledExpr::Term(w) => keyword.contains(w.as_str()),
        CompiledExpr::Exact(w) => keyword == w,
        CompiledExpr::TermExclude(w, inner) => {
            keyword.contains(w.as_str()) && !eval(inner, keyword)
        }
        CompiledExpr::And(a, b) => eval(a, keyword) && eval(b, keyword),
        CompiledExpr::Or(a, b) => eval(a, keyword) || eval(b, keyword),
        CompiledExpr::Always => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_rule;

    fn compile(rule: &str, case_sensitive: bool) -> Predicate {
        Predicate::compile(&parse_rule(rule).unwrap(), case_sensitive)
    }

    #[test]
    fn term_is_substring_match() {
        let p = compile("培训", true);
        assert!(p.matches("职业培训班"));
        assert!(p.matches("培训"));
        assert!(!p.matches("学校"));
    }

    #[test]
    fn exact_requires_full_equality() {
        let p = compile("[在线]", true);
        assert!(p.matches("在线"));
        assert!(!p.matches("在线教育"));
    }

    #[test]
    fn exclusion_requires_substring_and_inner_false() {
        let p = compile("培训<学校|机构>", true);
        assert!(p.matches("职业培训"));
        assert!(!p.matches("培训学校"));
        assert!(!p.matches("培训机构"));
        assert!(!p.matches("学校"));
    }

    #[test]
    fn and_requires_both_sides() {
        let p = compile("英语+培训", true);
        assert!(p.matches("英语培训班"));
        assert!(!p.matches("英语课程"));
        assert!(!p.matches("数学培训"));
    }

    #[test]
    fn or_requires_either_side() {
        let p = compile("英语|数学", true);
        assert!(p.matches("英语班"));
        assert!(p.matches("数学班"));
        assert!(!p.matches("语文班"));
    }

    #[test]
    fn group_is_precedence_only() {
        let grouped = compile("(a|b)", true);
        let bare = compile("a|b", true);
        for kw in ["a1", "2b", "c"] {
            assert_eq!(grouped.matches(kw), bare.matches(kw));
        }
    }

    #[test]
    fn and_binds_tighter_than_or() {
        // a+b|c: "c" alone matches, "a" alone does not
        let p = compile("a+b|c", true);
        assert!(p.matches("xcx"));
        assert!(!p.matches("xax"));
        assert!(p.matches("ab"));
    }

    #[test]
    fn grouping_overrides_precedence() {
        // a+(b|c): "c" alone no longer matches
        let p = compile("a+(b|c)", true);
        assert!(!p.matches("xcx"));
        assert!(p.matches("ac"));
        assert!(p.matches("ab"));
    }

    #[test]
    fn case_insensitive_folds_both_sides() {
        let p = compile("ABC", false);
        assert!(p.matches("xxabcxx"));
        assert!(p.matches("xxABCxx"));

        let exact = compile("[Word]", false);
        assert!(exact.matches("word"));
        assert!(exact.matches("WORD"));
        assert!(!exact.matches("words"));
    }

    #[test]
    fn case_sensitive_does_not_fold() {
        let p = compile("ABC", true);
        assert!(p.matches("xABCx"));
        assert!(!p.matches("xabcx"));
    }

    #[test]
    fn match_all_matches_everything() {
        let p = Predicate::match_all();
        assert!(p.matches(""));
        assert!(p.matches("anything at all"));
        assert!(p.matches("全"));
    }

    #[test]
    fn compiled_exclusion_case_insensitive() {
        let p = compile("Train<School>", false);
        assert!(p.matches("training camp"));
        assert!(!p.matches("TRAINING SCHOOL"));
    }
}
