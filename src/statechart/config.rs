//! Declarative state tree configuration.
//!
//! A [`StateNodeConfig`] describes one node and, recursively, its children.
//! Any node may carry [`RouteMeta`] declaring the path template it is
//! reachable under. Configuration is plain data plus shared closures, so it
//! can be cloned and rewritten before a machine is built from it.

use super::address::StateAddress;
use super::event::Event;
use super::guard::Guard;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Context mutation run when a transition fires.
pub type Action<C> = Rc<dyn Fn(&mut C, &Event)>;

/// Route metadata attached to a state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Path template, e.g. `/substate/:id/c` or `(.*)`.
    pub path: String,
}

impl RouteMeta {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Where a transition goes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Resolved against the declaring state's parent (siblings and their
    /// descendants). On the root it is resolved against the root itself.
    Relative(StateAddress),
    /// Resolved from the root.
    Absolute(StateAddress),
}

/// One candidate reaction to an event.
pub struct TransitionConfig<C> {
    pub(crate) target: Option<Target>,
    pub(crate) guard: Option<Guard<C>>,
    pub(crate) actions: Vec<Action<C>>,
}

impl<C> TransitionConfig<C> {
    /// Transition to a state relative to the declaring state's parent,
    /// written dotted (`"substate.c"`).
    pub fn to(target: &str) -> Self {
        Self::with_target(Some(Target::Relative(StateAddress::parse(target))))
    }

    /// Transition to an absolute address.
    pub fn to_address(address: StateAddress) -> Self {
        Self::with_target(Some(Target::Absolute(address)))
    }

    /// Targetless transition: runs its actions, keeps the active state, and
    /// stops the event from reaching ancestor handlers.
    pub fn stay() -> Self {
        Self::with_target(None)
    }

    fn with_target(target: Option<Target>) -> Self {
        Self {
            target,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Only fire when the predicate holds.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, &Event) -> bool + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Append a context mutation.
    pub fn assign<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C, &Event) + 'static,
    {
        self.actions.push(Rc::new(action));
        self
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }
}

impl<C> Clone for TransitionConfig<C> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            guard: self.guard.clone(),
            actions: self.actions.iter().map(Rc::clone).collect(),
        }
    }
}

/// Declarative description of a state node and its subtree.
///
/// # Example
///
/// ```rust
/// use mindset_router::statechart::{StateNodeConfig, TransitionConfig};
///
/// let config: StateNodeConfig<()> = StateNodeConfig::new()
///     .initial("home")
///     .on("GoAbout", TransitionConfig::to("about"))
///     .state("home", StateNodeConfig::new().path("/"))
///     .state("about", StateNodeConfig::new().path("/about"));
///
/// assert_eq!(config.initial_state(), Some("home"));
/// assert_eq!(config.children().count(), 2);
/// assert_eq!(config.handlers("GoAbout").len(), 1);
/// ```
pub struct StateNodeConfig<C> {
    initial: Option<String>,
    meta: Option<RouteMeta>,
    on: Vec<(String, Vec<TransitionConfig<C>>)>,
    states: Vec<(String, StateNodeConfig<C>)>,
}

impl<C> StateNodeConfig<C> {
    pub fn new() -> Self {
        Self {
            initial: None,
            meta: None,
            on: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Name the child entered when this state is entered.
    pub fn initial(mut self, child: impl Into<String>) -> Self {
        self.initial = Some(child.into());
        self
    }

    /// Declare the path template this state is routable under.
    pub fn path(self, template: impl Into<String>) -> Self {
        self.meta(RouteMeta::new(template))
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Add a candidate transition for `event`. Candidates are tried in the
    /// order they were added.
    pub fn on(mut self, event: impl Into<String>, transition: TransitionConfig<C>) -> Self {
        let event = event.into();
        match self.on.iter_mut().find(|(name, _)| *name == event) {
            Some((_, handlers)) => handlers.push(transition),
            None => self.on.push((event, vec![transition])),
        }
        self
    }

    /// Add a child state. Children keep declaration order.
    pub fn state(mut self, name: impl Into<String>, child: StateNodeConfig<C>) -> Self {
        self.states.push((name.into(), child));
        self
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    pub fn route_meta(&self) -> Option<&RouteMeta> {
        self.meta.as_ref()
    }

    pub fn path_template(&self) -> Option<&str> {
        self.meta.as_ref().map(|meta| meta.path.as_str())
    }

    /// Candidates declared for `event` (empty when none).
    pub fn handlers(&self, event: &str) -> &[TransitionConfig<C>] {
        self.on
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, handlers)| handlers.as_slice())
            .unwrap_or(&[])
    }

    /// All declared events with their candidates, in declaration order.
    pub fn events(&self) -> impl Iterator<Item = (&str, &[TransitionConfig<C>])> {
        self.on
            .iter()
            .map(|(name, handlers)| (name.as_str(), handlers.as_slice()))
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &StateNodeConfig<C>)> {
        self.states.iter().map(|(name, child)| (name.as_str(), child))
    }

    /// Replace every candidate for `event`, keeping its position among the
    /// declared events.
    pub(crate) fn set_handlers(&mut self, event: &str, handlers: Vec<TransitionConfig<C>>) {
        match self.on.iter_mut().find(|(name, _)| name == event) {
            Some((_, existing)) => *existing = handlers,
            None => self.on.push((event.to_string(), handlers)),
        }
    }
}

impl<C> Default for StateNodeConfig<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for StateNodeConfig<C> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            meta: self.meta.clone(),
            on: self.on.clone(),
            states: self.states.clone(),
        }
    }
}
