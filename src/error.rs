use thiserror::Error;

use crate::{InputError, WorkflowValidationError};

/// Unified error type covering input validation and workflow validation.
///
/// Returned by convenience methods like
/// [`Workflow::process()`](crate::Workflow::process) that cross both
/// boundaries. Per-rule syntax errors and per-evaluation failures are not
/// errors at this level; they are recovered locally and reported through the
/// diagnostic sink and the returned error lists.
#[derive(Debug, Error)]
pub enum KeysieveError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Validation(#[from] WorkflowValidationError),
}
