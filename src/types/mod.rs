mod diagnostic;
mod error;
mod expr;
mod keywords;
mod outcome;
mod rule;
mod ruleset;

pub use diagnostic::{Diagnostic, DiagnosticSink, NullSink};
pub use error::{InputError, WorkflowValidationError};
pub use expr::Expr;
pub use keywords::Keywords;
pub use outcome::{Classification, ClassifiedKeyword, ClassifiedResult, UnmatchedKeyword};
pub use rule::WorkflowRule;
pub use ruleset::{RuleSet, RuleSetBuilder};

pub(crate) use ruleset::CompiledRule;
