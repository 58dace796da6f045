mod classify;
mod compile;
mod error;
mod normalize;
mod parse;
mod types;
mod workflow;

pub use compile::Predicate;
pub use error::KeysieveError;
pub use normalize::clean;
pub use parse::{parse_rule, RuleSyntaxError, MAX_DEPTH};
pub use types::{
    Classification, ClassifiedKeyword, ClassifiedResult, Diagnostic, DiagnosticSink, Expr,
    InputError, Keywords, NullSink, RuleSet, RuleSetBuilder, UnmatchedKeyword, WorkflowRule,
    WorkflowValidationError,
};
pub use workflow::{Workflow, WorkflowReport, MATCH_ALL, UNMATCHED};
