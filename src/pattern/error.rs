//! Pattern compilation errors.

use thiserror::Error;

/// Errors raised while compiling a path template into a matcher.
///
/// Every variant points at a programming error in a route declaration,
/// so these surface when a route table is built, never while syncing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("Template '{template}' has a ':' without a parameter name at byte {position}")]
    MissingParameterName { template: String, position: usize },

    #[error("Template '{template}' opens a group at byte {position} that is never closed")]
    UnbalancedGroup { template: String, position: usize },

    #[error("Template '{template}' has an empty group at byte {position}")]
    EmptyGroup { template: String, position: usize },

    #[error("Template '{template}' nests a capturing group at byte {position}; use (?:...)")]
    NestedCapture { template: String, position: usize },

    #[error("Template '{template}' compiles to an invalid expression: {message}")]
    Regex { template: String, message: String },
}

impl PatternError {
    /// The template that failed to compile.
    pub fn template(&self) -> &str {
        match self {
            Self::MissingParameterName { template, .. }
            | Self::UnbalancedGroup { template, .. }
            | Self::EmptyGroup { template, .. }
            | Self::NestedCapture { template, .. }
            | Self::Regex { template, .. } => template,
        }
    }
}
