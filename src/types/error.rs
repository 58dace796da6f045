use thiserror::Error;

/// Fatal problems with the input of a single call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("keyword input is empty after normalization")]
    EmptyKeywords,

    #[error("rule input contains no rule strings")]
    EmptyRules,
}

/// Structural violations of a workflow's rule hierarchy.
///
/// Always fatal: a workflow that fails validation performs no
/// classification work at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowValidationError {
    #[error("workflow declares no rules")]
    NoRules,

    #[error("workflow declares no level 1 rules; level 1 is the entry stage")]
    MissingLevelOne,

    #[error("rule '{rule}' declares level 0; levels start at 1")]
    InvalidLevel { rule: String },

    #[error("workflow has rules above level {missing} but none at level {missing}")]
    NonContiguousLevels { missing: u32 },

    #[error("rule '{rule}' at level {level} must declare an output sheet name")]
    MissingSheet { rule: String, level: u32 },

    #[error("rule '{rule}' at level {level} must declare a parent rule")]
    MissingParent { rule: String, level: u32 },

    #[error("duplicate workflow rule: bucket '{bucket}', rule '{rule}', sheet '{}'", sheet.as_deref().unwrap_or("-"))]
    DuplicateRule {
        bucket: String,
        rule: String,
        sheet: Option<String>,
    },

    #[error("rule '{rule}' at level {level} targets bucket '{bucket}', which no level 1 rule produces")]
    UnknownBucket {
        rule: String,
        bucket: String,
        level: u32,
    },

    #[error("rule '{rule}' at level {level} scopes to parent '{parent}', which does not exist at level {}", level - 1)]
    UnknownParent {
        rule: String,
        parent: String,
        level: u32,
    },
}
