//! Running service over a [`Machine`].
//!
//! The interpreter owns the active leaf, the extended context and the
//! transition log. Events are processed synchronously; subscribers are
//! notified after every processed event, whether or not a transition fired.
//! Subscribers may call back into the interpreter.

use super::address::StateAddress;
use super::event::Event;
use super::log::{TransitionLog, TransitionRecord};
use super::machine::{Machine, NodeId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{trace, warn};

/// Lifecycle of an interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    NotStarted,
    Running,
    Stopped,
}

/// What subscribers see after an event was processed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Address of the active leaf.
    pub value: StateAddress,
    /// Whether a transition (targeted or not) fired.
    pub changed: bool,
    /// The processed event; `None` for the start notification.
    pub event: Option<Event>,
}

/// Handle returned by [`Interpreter::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type TransitionListener = Rc<dyn Fn(&StateSnapshot)>;

struct Inner<C> {
    active: NodeId,
    context: C,
    log: TransitionLog,
}

/// Interpreter (service) running a machine.
///
/// # Example
///
/// ```rust
/// use mindset_router::statechart::{Interpreter, Machine, StateNodeConfig, TransitionConfig};
///
/// let config: StateNodeConfig<u32> = StateNodeConfig::new()
///     .initial("idle")
///     .state(
///         "idle",
///         StateNodeConfig::new()
///             .on("Start", TransitionConfig::to("busy").assign(|n: &mut u32, _| *n += 1)),
///     )
///     .state("busy", StateNodeConfig::new());
///
/// let service = Interpreter::new(Machine::new(&config).unwrap(), 0);
/// service.start();
/// let snapshot = service.send("Start");
///
/// assert!(snapshot.changed);
/// assert!(service.matches("busy"));
/// assert_eq!(service.context(), 1);
/// ```
pub struct Interpreter<C> {
    machine: Machine<C>,
    inner: RefCell<Inner<C>>,
    status: Cell<Status>,
    processing: Cell<bool>,
    listeners: RefCell<Vec<(SubscriptionId, TransitionListener)>>,
    next_subscription: Cell<u64>,
}

impl<C> Interpreter<C> {
    pub fn new(machine: Machine<C>, context: C) -> Self {
        let active = machine.initial_leaf(machine.root());
        Self {
            machine,
            inner: RefCell::new(Inner {
                active,
                context,
                log: TransitionLog::new(),
            }),
            status: Cell::new(Status::NotStarted),
            processing: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        }
    }

    /// Keep at most `capacity` transition records; `None` keeps all of them.
    pub fn with_log_capacity(mut self, capacity: Option<usize>) -> Self {
        self.inner.get_mut().log = match capacity {
            Some(limit) => TransitionLog::bounded(limit),
            None => TransitionLog::new(),
        };
        self
    }

    /// Start processing events. Current subscribers get a first snapshot.
    pub fn start(&self) {
        if self.status.get() == Status::Running {
            return;
        }
        self.status.set(Status::Running);
        let snapshot = StateSnapshot {
            value: self.active_address(),
            changed: true,
            event: None,
        };
        self.notify(&snapshot);
    }

    /// Stop processing events. Later sends are ignored.
    pub fn stop(&self) {
        self.status.set(Status::Stopped);
    }

    pub fn status(&self) -> Status {
        self.status.get()
    }

    /// True while the actions of an event are running. Subscribers are
    /// never called in this window.
    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    /// Process one event to completion, then notify subscribers.
    ///
    /// Actions run before the active leaf changes. Actions must not call
    /// back into the interpreter.
    pub fn send(&self, event: impl Into<Event>) -> StateSnapshot {
        let event = event.into();
        if self.status.get() != Status::Running {
            warn!(event = event.name(), status = ?self.status.get(), "event sent to an interpreter that is not running");
            return StateSnapshot {
                value: self.active_address(),
                changed: false,
                event: Some(event),
            };
        }

        self.processing.set(true);
        let snapshot = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let changed = match self.machine.select(inner.active, &inner.context, &event) {
                Some(transition) => {
                    for action in &transition.actions {
                        action(&mut inner.context, &event);
                    }
                    if let Some(target) = transition.target {
                        let next = self.machine.initial_leaf(target);
                        let from = self.machine.node(inner.active).address().clone();
                        let to = self.machine.node(next).address().clone();
                        trace!(%from, %to, event = event.name(), "transition");
                        inner.log.push(TransitionRecord {
                            from,
                            to,
                            event: event.name().to_string(),
                            timestamp: Utc::now(),
                        });
                        inner.active = next;
                    }
                    true
                }
                None => false,
            };
            StateSnapshot {
                value: self.machine.node(inner.active).address().clone(),
                changed,
                event: Some(event),
            }
        };
        self.processing.set(false);

        self.notify(&snapshot);
        snapshot
    }

    /// Register a listener called after every processed event.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StateSnapshot) + 'static,
    {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }

    pub fn machine(&self) -> &Machine<C> {
        &self.machine
    }

    pub fn active_node(&self) -> NodeId {
        self.inner.borrow().active
    }

    pub fn active_address(&self) -> StateAddress {
        let active = self.active_node();
        self.machine.node(active).address().clone()
    }

    /// True when the active leaf is at, or below, the dotted address.
    pub fn matches(&self, address: &str) -> bool {
        self.machine
            .matches_state(self.active_node(), &StateAddress::parse(address))
    }

    /// Read the context without cloning it.
    pub fn with_context<R>(&self, read: impl FnOnce(&C) -> R) -> R {
        read(&self.inner.borrow().context)
    }

    pub fn log(&self) -> TransitionLog {
        self.inner.borrow().log.clone()
    }

    fn notify(&self, snapshot: &StateSnapshot) {
        let listeners: Vec<TransitionListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl<C: Clone> Interpreter<C> {
    pub fn context(&self) -> C {
        self.inner.borrow().context.clone()
    }
}
