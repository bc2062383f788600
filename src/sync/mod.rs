//! Bidirectional synchronization between a machine and a history.
//!
//! - [`add_router_events`] rewrites a state configuration so the root
//!   reacts to the reserved route-changed event
//! - [`RoutedContext`] carries the location and matched parameters
//! - [`Router`] wires the interpreter and the history together
//!
//! Both sides notify the router through a single FIFO mailbox. A
//! notification raised while another is being handled is queued and
//! handled afterwards, never inline. Self-caused echoes are swallowed by
//! one-shot flags (see [`SyncPhase`]).

mod augment;
mod context;
mod debounce;
mod router;

pub use augment::add_router_events;
pub use context::RoutedContext;
pub use debounce::SyncPhase;
pub use router::{router_machine, Router, RouterArgs};
