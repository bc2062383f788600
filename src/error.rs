//! Crate-level errors.
//!
//! Only construction fails. Once a router is running, an unmatched
//! location is a logged no-op rather than an error.

use crate::pattern::PatternError;
use crate::statechart::BuildError;
use thiserror::Error;

/// Errors raised while setting up a router.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Every route template that failed to compile, not just the first.
    #[error("{} malformed route template(s): {}", .0.len(), summarize(.0))]
    MalformedRoutes(Vec<PatternError>),

    #[error("invalid state configuration: {0}")]
    Build(#[from] BuildError),

    #[error("invalid router options: {0}")]
    Options(#[from] serde_json::Error),
}

fn summarize(errors: &[PatternError]) -> String {
    errors
        .iter()
        .map(|e| e.template())
        .collect::<Vec<_>>()
        .join(", ")
}
