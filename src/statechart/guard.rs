//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions of the context and the event being
//! processed. A transition whose guard fails is skipped and the next
//! candidate is tried.

use super::event::Event;
use std::rc::Rc;

/// Pure predicate that decides whether a transition may fire.
///
/// # Example
///
/// ```rust
/// use mindset_router::statechart::{Event, Guard};
///
/// struct Session { logged_in: bool }
///
/// let only_logged_in = Guard::new(|ctx: &Session, _event: &Event| ctx.logged_in);
///
/// assert!(only_logged_in.check(&Session { logged_in: true }, &Event::new("Open")));
/// assert!(!only_logged_in.check(&Session { logged_in: false }, &Event::new("Open")));
/// ```
pub struct Guard<C> {
    predicate: Rc<dyn Fn(&C, &Event) -> bool>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects; it can
    /// run several times while the interpreter looks for a transition.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, &Event) -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self, context: &C, event: &Event) -> bool {
        (self.predicate)(context, event)
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}
