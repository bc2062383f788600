//! The running synchronization between one interpreter and one history.

use super::augment::add_router_events;
use super::context::RoutedContext;
use super::debounce::{Debounce, SyncPhase};
use crate::config::RouterOptions;
use crate::error::RouterError;
use crate::navigation::{History, ListenerId, Location, NavigationAction};
use crate::pattern::{Params, PathPattern};
use crate::routes::{resolve, RouteTable};
use crate::statechart::{
    Event, Interpreter, Machine, StateAddress, StateNodeConfig, StateSnapshot, SubscriptionId,
    SyncOrigin,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::{debug, info, trace};

/// Everything needed to start a [`Router`].
pub struct RouterArgs<A, H> {
    /// State tree; any node may declare a path.
    pub config: StateNodeConfig<RoutedContext<A>>,
    /// Application part of the context.
    pub initial_context: A,
    pub history: Rc<H>,
    pub options: RouterOptions,
}

impl<A, H> RouterArgs<A, H> {
    pub fn new(config: StateNodeConfig<RoutedContext<A>>, initial_context: A, history: Rc<H>) -> Self {
        Self {
            config,
            initial_context,
            history,
            options: RouterOptions::default(),
        }
    }

    pub fn options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }
}

enum Notification {
    Transition,
    Navigation(Location),
}

struct Controller<A, H> {
    service: Rc<Interpreter<RoutedContext<A>>>,
    history: Rc<H>,
    routes: Rc<RouteTable>,
    debounce: RefCell<Debounce>,
    mailbox: RefCell<VecDeque<Notification>>,
    draining: Cell<bool>,
}

impl<A, H: History> Controller<A, H> {
    /// Queue a notification and, unless a handler is already running
    /// further up the stack, handle everything queued in order.
    ///
    /// While the interpreter is in the middle of an event (a transition
    /// action updated the history) nothing is handled; the transition
    /// notification that follows the event drains the queue.
    fn deliver(&self, notification: Notification) {
        self.mailbox.borrow_mut().push_back(notification);
        if self.service.is_processing() {
            trace!(queued = self.mailbox.borrow().len(), "notification queued until the event completes");
            return;
        }
        if self.draining.replace(true) {
            trace!(queued = self.mailbox.borrow().len(), "notification queued");
            return;
        }
        loop {
            let next = self.mailbox.borrow_mut().pop_front();
            match next {
                Some(Notification::Transition) => self.on_transition(),
                Some(Notification::Navigation(location)) => self.on_navigation(&location),
                None => break,
            }
        }
        self.draining.set(false);
    }

    /// The machine moved: bring the history in line with it.
    fn on_transition(&self) {
        let machine = self.service.machine();
        let active = self.service.active_node();
        let path = machine.find_path_recursive(active);

        if self.debounce.borrow_mut().absorb_state_echo(path) {
            debug!(path = ?path, "transition caused by a route change, ignored");
            return;
        }
        let Some(template) = path else {
            return;
        };
        let Some(pattern) = self.routes.pattern(template) else {
            return;
        };

        let location = self.history.location();
        let matched = self
            .service
            .with_context(|ctx| ctx.matched.clone())
            .unwrap_or_default();
        if let Some(current) = pattern.matches(&location.pathname) {
            if !drifted(pattern, &matched, &current) {
                return;
            }
        }

        let uri = pattern.build(&matched);
        if uri == location.pathname {
            return;
        }
        debug!(state = %machine.node(active).address(), %uri, "pushing path for state");
        self.debounce.borrow_mut().expect_history_echo();
        self.history.push(&uri);
        self.service
            .send(Event::route_changed(SyncOrigin::Machine, Some(template.to_string())));
    }

    /// The history moved: drive the machine to the matching state.
    fn on_navigation(&self, location: &Location) {
        if self.debounce.borrow_mut().absorb_history_echo() {
            debug!(path = %location.pathname, "navigation caused by the router, ignored");
            return;
        }
        let Some((route, _)) = self.routes.resolve_route(location) else {
            debug!(path = %location.pathname, "no route matched");
            return;
        };
        debug!(path = %location.pathname, route = %route.path, state = %route.address, "route resolved");

        self.debounce.borrow_mut().expect_state_echo(&route.path);
        self.service
            .send(Event::route_changed(SyncOrigin::History, Some(route.path.clone())));

        let machine = self.service.machine();
        let active = self.service.active_node();
        if machine.matches_state(active, &route.address) {
            return;
        }
        let Some(own) = machine.node(active).path() else {
            return;
        };
        if own == route.path {
            return;
        }
        let Some(pattern) = self.routes.pattern(own) else {
            return;
        };
        let matched = self
            .service
            .with_context(|ctx| ctx.matched.clone())
            .unwrap_or_default();
        let uri = pattern.build(&matched);
        if uri == location.pathname {
            return;
        }
        debug!(state = %machine.node(active).address(), %uri, "route change redirected, replacing path");
        self.debounce.borrow_mut().expect_history_echo();
        self.history.replace(&uri);
    }
}

/// True when `matched` names every placeholder of `pattern` and at least
/// one of them differs from what the current path captured.
fn drifted(pattern: &PathPattern, matched: &Params, current: &Params) -> bool {
    let keys: Vec<&str> = pattern.named_keys().collect();
    if keys.is_empty() {
        return false;
    }
    let wanted: Option<Vec<&str>> = keys
        .iter()
        .map(|key| matched.get(*key).and_then(Option::as_deref))
        .collect();
    match wanted {
        Some(values) => keys
            .iter()
            .zip(values)
            .any(|(key, value)| current.get(*key).and_then(Option::as_deref) != Some(value)),
        None => false,
    }
}

/// A started interpreter kept in sync with a navigation history.
///
/// Machine transitions push the path of the nearest routable state;
/// history changes send the reserved route-changed event so the machine
/// enters the state of the first matching route. Each side's reaction to
/// the other's echo is suppressed once.
///
/// Dropping the router detaches it from both sides.
///
/// # Example
///
/// ```rust
/// use mindset_router::navigation::{History, MemoryHistory};
/// use mindset_router::statechart::{StateNodeConfig, TransitionConfig};
/// use mindset_router::sync::{Router, RouterArgs};
/// use std::rc::Rc;
///
/// let config = StateNodeConfig::new()
///     .initial("home")
///     .on("GoAbout", TransitionConfig::to("about"))
///     .state("home", StateNodeConfig::new().path("/"))
///     .state("about", StateNodeConfig::new().path("/about"));
///
/// let history = Rc::new(MemoryHistory::at("/"));
/// let router = Router::new(RouterArgs::new(config, (), Rc::clone(&history))).unwrap();
///
/// router.send("GoAbout");
/// assert_eq!(history.location().pathname, "/about");
///
/// history.back();
/// assert!(router.matches("home"));
/// ```
pub struct Router<A: 'static, H: History + 'static> {
    shared: Rc<Controller<A, H>>,
    subscription: SubscriptionId,
    listener: ListenerId,
}

impl<A: 'static, H: History + 'static> Router<A, H> {
    /// Build the route table and the machine, start the interpreter and
    /// synchronize it with the current location.
    pub fn new(args: RouterArgs<A, H>) -> Result<Self, RouterError> {
        let RouterArgs {
            config,
            initial_context,
            history,
            options,
        } = args;

        let routes = Rc::new(RouteTable::from_config(&config, &options)?);
        let augmented = add_router_events(&history, &config, &routes);
        let machine = Machine::new(&augmented)?;

        let location = history.location();
        let matched = resolve(&routes, &location, false);
        let context = RoutedContext::new(initial_context, location.clone(), matched);

        let service =
            Rc::new(Interpreter::new(machine, context).with_log_capacity(options.log_capacity));
        service.start();

        let shared = Rc::new(Controller {
            service: Rc::clone(&service),
            history: Rc::clone(&history),
            routes: Rc::clone(&routes),
            debounce: RefCell::new(Debounce::new()),
            mailbox: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
        });

        let weak: Weak<Controller<A, H>> = Rc::downgrade(&shared);
        let subscription = service.subscribe(move |_: &StateSnapshot| {
            if let Some(controller) = weak.upgrade() {
                controller.deliver(Notification::Transition);
            }
        });

        let weak: Weak<Controller<A, H>> = Rc::downgrade(&shared);
        let listener = history.listen(Rc::new(move |location: &Location, _: NavigationAction| {
            if let Some(controller) = weak.upgrade() {
                controller.deliver(Notification::Navigation(location.clone()));
            }
        }));

        info!(
            routes = routes.len(),
            path = %location.pathname,
            state = %service.active_address(),
            "router started"
        );
        shared.deliver(Notification::Navigation(location));

        Ok(Self {
            shared,
            subscription,
            listener,
        })
    }

    /// Send an application event to the machine. Any resulting history
    /// update has happened by the time this returns.
    pub fn send(&self, event: impl Into<Event>) -> StateSnapshot {
        self.shared.service.send(event)
    }

    pub fn service(&self) -> &Rc<Interpreter<RoutedContext<A>>> {
        &self.shared.service
    }

    pub fn history(&self) -> &Rc<H> {
        &self.shared.history
    }

    pub fn routes(&self) -> &RouteTable {
        &self.shared.routes
    }

    /// Address of the active leaf.
    pub fn state(&self) -> StateAddress {
        self.shared.service.active_address()
    }

    pub fn matches(&self, address: &str) -> bool {
        self.shared.service.matches(address)
    }

    /// Echoes still expected from either side.
    pub fn phase(&self) -> SyncPhase {
        self.shared.debounce.borrow().phase()
    }
}

impl<A: Clone + 'static, H: History + 'static> Router<A, H> {
    pub fn context(&self) -> RoutedContext<A> {
        self.shared.service.context()
    }
}

impl<A: 'static, H: History + 'static> Drop for Router<A, H> {
    fn drop(&mut self) {
        self.shared.service.unsubscribe(self.subscription);
        self.shared.history.unlisten(self.listener);
    }
}

/// Start a router. Shorthand for [`Router::new`].
pub fn router_machine<A: 'static, H: History + 'static>(
    args: RouterArgs<A, H>,
) -> Result<Router<A, H>, RouterError> {
    Router::new(args)
}
