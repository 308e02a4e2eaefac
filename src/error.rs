use thiserror::Error;

use crate::jobs::store::StoreError;
use crate::jobs::{JobAction, JobState};

/// Everything the admin pipeline can reject a request for.
///
/// All variants are recovered at the API boundary and surfaced as a
/// structured `{Status, Message}` response; none escape as panics. The
/// pipeline is strictly fail-fast: the first failing stage produces exactly
/// one of these and no later stage runs.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid cron expression: {0}")]
    InvalidCronFormat(String),

    #[error("Unknown time zone '{0}'")]
    UnknownTimeZone(String),

    #[error("Type '{0}' not found in the catalog")]
    TypeNotFound(String),

    #[error("Method '{method}' not found on type '{type_name}'")]
    MethodNotFound { type_name: String, method: String },

    #[error("Expected {expected} argument(s), got {supplied}")]
    ArgumentCountMismatch { expected: usize, supplied: usize },

    #[error("Argument {index} is not convertible to '{attempted_type}'")]
    ArgumentCoercionFailed {
        index: usize,
        attempted_type: String,
    },

    #[error("Arguments do not match method '{method}' on type '{type_name}'")]
    ArgumentsInvalid { type_name: String, method: String },

    #[error("Job '{id}' cannot '{action}' from state '{from}'")]
    StateTransitionInvalid {
        id: String,
        from: JobState,
        action: JobAction,
    },

    #[error("Job store failure: {0}")]
    Store(#[from] StoreError),
}
