mod error;
mod grammar;

pub use error::RuleSyntaxError;

use crate::Expr;

/// Maximum `(`/`<` nesting depth a rule may use.
pub const MAX_DEPTH: usize = 64;

/// Parse one rule string into an [`Expr`].
///
/// # Errors
///
/// Returns [`RuleSyntaxError`] if the rule is empty after trimming, nests
/// deeper than [`MAX_DEPTH`] levels, or violates the grammar.
pub fn parse_rule(rule: &str) -> Result<Expr, RuleSyntaxError> {
    use winnow::Parser;

    if rule.trim().is_empty() {
        return Err(RuleSyntaxError::new(rule, "empty rule"));
    }
    if nesting_depth(rule) > MAX_DEPTH {
        return Err(RuleSyntaxError::new(
            rule,
            format!("nesting deeper than {MAX_DEPTH} levels"),
        ));
    }
    grammar::expr
        .parse(rule)
        .map_err(|e| RuleSyntaxError::new(rule, e.to_string()))
}

/// Deepest `(`/`<` nesting in the raw text, checked before parsing so the
/// recursive descent cannot overflow the stack on adversarial input.
fn nesting_depth(rule: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for c in rule.chars() {
        match c {
            '(' | '<' => {
                depth += 1;
                max = max.max(depth);
            }
            ')' | '>' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}
