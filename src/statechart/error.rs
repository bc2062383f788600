//! Build errors for state machines.

use thiserror::Error;

/// Errors that can occur when turning a [`StateNodeConfig`] into a machine.
///
/// [`StateNodeConfig`]: super::StateNodeConfig
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("State '{state}' has children but no initial child. Call .initial(name)")]
    MissingInitial { state: String },

    #[error("State '{state}' names initial child '{initial}', which does not exist")]
    UnknownInitial { state: String, initial: String },

    #[error("Transition on '{event}' in state '{state}' targets unknown state '{target}'")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },

    #[error("State '{state}' declares child '{child}' more than once")]
    DuplicateState { state: String, child: String },
}
