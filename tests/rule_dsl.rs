use keysieve::{Keywords, NullSink, RuleSet, RuleSetBuilder};

fn matched_keywords(rule: &str, keywords: &[&str]) -> Vec<String> {
    let (ruleset, errors) = RuleSet::compile([rule], &NullSink).unwrap();
    assert!(errors.is_empty(), "rule should parse: {errors:?}");
    let keywords = Keywords::new(keywords, &NullSink).unwrap();
    ruleset
        .classify(&keywords, &NullSink)
        .into_iter()
        .filter(|c| c.is_matched())
        .map(|c| c.keyword().to_owned())
        .collect()
}

#[test]
fn exclusion_rule_end_to_end() {
    // 培训 must be a substring, but none of the excluded suffixes may match.
    let matched = matched_keywords(
        "培训<学校|中学|中心|班|机构>",
        &["培训机构", "培训学校", "职业培训", "培训课程"],
    );
    assert_eq!(matched, ["职业培训", "培训课程"]);
}

#[test]
fn exact_rule_end_to_end() {
    let matched = matched_keywords("[在线]", &["在线", "在线教育", "教育在线", "离线"]);
    assert_eq!(matched, ["在线"]);
}

#[test]
fn exact_composes_with_substring() {
    // [在线]+教育 can never match: equality to 在线 excludes containing 教育.
    let matched = matched_keywords("[在线]+教育", &["在线", "在线教育"]);
    assert!(matched.is_empty());

    let matched = matched_keywords("[在线教育]|教育", &["在线教育", "成人教育", "在线"]);
    assert_eq!(matched, ["在线教育", "成人教育"]);
}

#[test]
fn and_binds_tighter_than_or() {
    // a+b|c matches on c alone, but not on a alone.
    let matched = matched_keywords("a+b|c", &["xa", "xc", "ab", "d"]);
    assert_eq!(matched, ["xc", "ab"]);
}

#[test]
fn grouping_overrides_precedence() {
    // a+(b|c) requires a in every match.
    let matched = matched_keywords("a+(b|c)", &["xa", "xc", "ab", "ac", "d"]);
    assert_eq!(matched, ["ab", "ac"]);
}

#[test]
fn nested_exclusions() {
    // 培训<班<晚班>> : contains 培训, and NOT (contains 班 unless it is a 晚班).
    let matched = matched_keywords(
        "培训<班<晚班>>",
        &["培训课程", "培训班", "培训晚班", "课程"],
    );
    assert_eq!(matched, ["培训课程", "培训晚班"]);
}

#[test]
fn invalid_rules_do_not_poison_the_set() {
    let rules = ["英语", "a+", "[在线", "数学", "()"];
    let (ruleset, errors) = RuleSet::compile(rules, &NullSink).unwrap();
    assert_eq!(ruleset.len(), 2);
    assert_eq!(errors.len(), 3);

    let keywords = Keywords::new(["英语角", "数学题"], &NullSink).unwrap();
    let results = ruleset.classify(&keywords, &NullSink);
    assert_eq!(results[0].matched(), ["英语"]);
    assert_eq!(results[1].matched(), ["数学"]);
}

#[test]
fn case_insensitive_by_default() {
    let (ruleset, _) = RuleSet::compile(["SEO"], &NullSink).unwrap();
    let keywords = Keywords::new(["seo优化", "SEO服务", "搜索"], &NullSink).unwrap();
    let results = ruleset.classify(&keywords, &NullSink);
    let matched: Vec<&str> = results
        .iter()
        .filter(|c| c.is_matched())
        .map(|c| c.keyword())
        .collect();
    assert_eq!(matched, ["seo优化", "SEO服务"]);
}

#[test]
fn case_sensitive_when_requested() {
    let (ruleset, _) = RuleSetBuilder::new()
        .case_sensitive(true)
        .compile(["SEO"], &NullSink)
        .unwrap();
    let keywords = Keywords::new(["seo优化", "SEO服务"], &NullSink).unwrap();
    let results = ruleset.classify(&keywords, &NullSink);
    assert!(!results[0].is_matched());
    assert!(results[1].is_matched());
}

#[test]
fn whitespace_in_rules_is_insignificant() {
    let compact = matched_keywords("培训<学校|机构>", &["职业培训", "培训学校"]);
    let spaced = matched_keywords("培训 < 学校 | 机构 >", &["职业培训", "培训学校"]);
    assert_eq!(compact, spaced);
}
