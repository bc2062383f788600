//! Hierarchical state machine used by the router.
//!
//! This module provides the machine side of synchronization:
//! - Declarative configuration via [`StateNodeConfig`] and [`TransitionConfig`]
//! - An arena-indexed, validated state tree ([`Machine`])
//! - A synchronous interpreter with transition subscriptions ([`Interpreter`])
//! - Transition logging, optionally bounded ([`TransitionLog`])
//!
//! Event resolution starts at the active leaf and walks up to the root; the
//! first enabled candidate wins. Entering a compound state enters its
//! initial child, recursively. Parallel regions and history states are not
//! modelled.

mod address;
mod config;
mod error;
mod event;
mod guard;
mod interpreter;
mod log;
mod machine;

pub use address::StateAddress;
pub use config::{Action, RouteMeta, StateNodeConfig, Target, TransitionConfig};
pub use error::BuildError;
pub use event::{Event, RouteChanged, SyncOrigin, ROUTE_CHANGED};
pub use guard::Guard;
pub use interpreter::{Interpreter, StateSnapshot, Status, SubscriptionId};
pub use log::{TransitionLog, TransitionRecord};
pub use machine::{Machine, NodeId, StateNode};
