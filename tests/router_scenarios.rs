//! End-to-end scenarios: a router driving a state tree over an in-memory
//! history, with history mutations counted to catch feedback loops.

use mindset_router::navigation::{History, ListenerId, Location, LocationListener, MemoryHistory};
use mindset_router::statechart::{Event, StateAddress, StateNodeConfig, TransitionConfig, ROUTE_CHANGED};
use mindset_router::sync::{RoutedContext, Router, RouterArgs};
use mindset_router::{RouterError, RouterOptions};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

type Ctx = RoutedContext<()>;

/// Memory history that counts the push and replace calls made on it.
struct CountingHistory {
    inner: MemoryHistory,
    pushes: Cell<usize>,
    replaces: Cell<usize>,
}

impl CountingHistory {
    fn at(path: &str) -> Rc<Self> {
        Rc::new(Self {
            inner: MemoryHistory::at(path),
            pushes: Cell::new(0),
            replaces: Cell::new(0),
        })
    }

    fn back(&self) {
        self.inner.back();
    }

    fn forward(&self) {
        self.inner.forward();
    }

    fn pathname(&self) -> String {
        self.inner.location().pathname
    }

    fn counts(&self) -> (usize, usize) {
        (self.pushes.get(), self.replaces.get())
    }
}

impl History for CountingHistory {
    fn location(&self) -> Location {
        self.inner.location()
    }

    fn push(&self, path: &str) {
        self.pushes.set(self.pushes.get() + 1);
        self.inner.push(path);
    }

    fn replace(&self, path: &str) {
        self.replaces.set(self.replaces.get() + 1);
        self.inner.replace(path);
    }

    fn listen(&self, listener: LocationListener) -> ListenerId {
        self.inner.listen(listener)
    }

    fn unlisten(&self, id: ListenerId) {
        self.inner.unlisten(id);
    }
}

fn from_history_to(event: &Event, route: &str) -> bool {
    event.as_route_changed().is_some_and(|e| e.is_route(route))
}

fn substate() -> StateNodeConfig<Ctx> {
    StateNodeConfig::new()
        .path("/substate")
        .initial("a")
        .state("a", StateNodeConfig::new().path("/substate/a"))
        .state("b", StateNodeConfig::new())
        .state("c", StateNodeConfig::new().path("/substate/:param/c"))
}

fn machine_config() -> StateNodeConfig<Ctx> {
    StateNodeConfig::new()
        .initial("home")
        .on("GoAbout", TransitionConfig::to("about"))
        .on("GoSubstateB", TransitionConfig::to("substate.b"))
        .on(
            "GoSubstateC",
            TransitionConfig::to("substate.c").assign(|ctx: &mut Ctx, event| ctx.assign_match(event.data())),
        )
        .state("home", StateNodeConfig::new().path("/"))
        .state(
            "about",
            StateNodeConfig::new()
                .path("/about")
                .on(
                    ROUTE_CHANGED,
                    TransitionConfig::to("substate.c")
                        .when(|_, event| from_history_to(event, "/substate/a"))
                        .assign(|ctx: &mut Ctx, _| ctx.assign_match(&json!({ "param": 815 }))),
                )
                .on(
                    ROUTE_CHANGED,
                    TransitionConfig::stay().when(|_, event| from_history_to(event, "/substate")),
                ),
        )
        .state("substate", substate())
        .state("noMatch", StateNodeConfig::new().path("(.*)"))
}

fn start(path: &str) -> (Rc<CountingHistory>, Router<(), CountingHistory>) {
    start_with(machine_config(), path)
}

fn start_with(config: StateNodeConfig<Ctx>, path: &str) -> (Rc<CountingHistory>, Router<(), CountingHistory>) {
    let history = CountingHistory::at(path);
    let router = Router::new(RouterArgs::new(config, (), Rc::clone(&history))).unwrap();
    (history, router)
}

fn state(router: &Router<(), CountingHistory>) -> String {
    router.state().to_string()
}

#[test]
fn entering_a_route_updates_the_state() {
    let (history, router) = start("/about");

    assert_eq!(state(&router), "about");
    assert_eq!(history.counts(), (0, 0));
}

#[test]
fn routable_initial_substate_updates_the_route() {
    let (history, router) = start("/substate");

    assert_eq!(state(&router), "substate.a");
    assert_eq!(history.pathname(), "/substate/a");
    assert_eq!(history.counts(), (1, 0));
}

#[test]
fn entering_a_routable_state_updates_the_route() {
    let (history, router) = start("/");

    router.send("GoAbout");

    assert_eq!(state(&router), "about");
    assert_eq!(history.pathname(), "/about");
    assert_eq!(history.counts(), (1, 0));
    assert_eq!(router.context().location.pathname, "/about");
}

#[test]
fn going_back_restores_the_previous_state() {
    let (history, router) = start("/");

    router.send("GoAbout");
    history.back();

    assert_eq!(state(&router), "home");
    assert_eq!(history.pathname(), "/");
    assert_eq!(history.counts(), (1, 0));
}

#[test]
fn route_change_can_be_redirected() {
    let (history, router) = start("/");

    router.send("GoAbout");
    history.replace("/substate/a");

    assert_eq!(state(&router), "substate.c");
    assert_eq!(history.pathname(), "/substate/815/c");
    // our replace plus the router's corrective one
    assert_eq!(history.counts(), (1, 2));
}

#[test]
fn parameterized_route_fills_match() {
    let (history, router) = start("/substate/816/c");

    assert_eq!(state(&router), "substate.c");
    assert_eq!(history.pathname(), "/substate/816/c");
    assert_eq!(router.context().param("param"), Some("816"));
    assert_eq!(history.counts(), (0, 0));
}

#[test]
fn route_change_can_be_stopped() {
    let (history, router) = start("/about");

    history.push("/substate");

    assert_eq!(state(&router), "about");
    assert_eq!(history.pathname(), "/about");
    assert_eq!(history.counts(), (1, 1));
}

#[test]
fn unrouted_substate_uses_nearest_routable_ancestor() {
    let (history, router) = start("/about");

    router.send("GoSubstateB");

    assert_eq!(state(&router), "substate.b");
    assert_eq!(history.pathname(), "/substate");
}

#[test]
fn parameterized_state_builds_route_from_match() {
    let (history, router) = start("/about");

    router.send(Event::with_data("GoSubstateC", json!({ "param": 817 })));

    assert_eq!(state(&router), "substate.c");
    assert_eq!(history.pathname(), "/substate/817/c");
    assert_eq!(router.context().param("param"), Some("817"));
}

#[test]
fn unmatched_path_goes_to_catch_all() {
    let (history, router) = start("/no-matching-route");

    assert_eq!(state(&router), "noMatch");
    assert_eq!(history.counts(), (0, 0));
}

#[test]
fn unmatched_path_without_catch_all_changes_nothing() {
    let config = StateNodeConfig::new()
        .initial("home")
        .state("home", StateNodeConfig::new().path("/"))
        .state("about", StateNodeConfig::new().path("/about"));
    let (history, router) = start_with(config, "/unknown");

    assert_eq!(state(&router), "home");
    assert_eq!(history.pathname(), "/unknown");
    assert_eq!(history.counts(), (0, 0));
}

#[test]
fn sloppy_path_is_resolved_by_tolerant_pass() {
    let config = StateNodeConfig::new()
        .initial("home")
        .state("home", StateNodeConfig::new().path("/"))
        .state("about", StateNodeConfig::new().path("/about"));
    let (history, router) = start_with(config, "//about//");

    assert_eq!(state(&router), "about");
    assert_eq!(history.counts(), (0, 0));
}

#[test]
fn parameter_drift_pushes_new_path() {
    let config = StateNodeConfig::new()
        .initial("list")
        .on(
            "Select",
            TransitionConfig::to("item").assign(|ctx: &mut Ctx, event| ctx.assign_match(event.data())),
        )
        .state("list", StateNodeConfig::new().path("/items"))
        .state("item", StateNodeConfig::new().path("/items/:id"));
    let (history, router) = start_with(config, "/items/1234");
    assert_eq!(router.context().param("id"), Some("1234"));

    router.send(Event::with_data("Select", json!({ "id": 4321 })));
    assert_eq!(history.pathname(), "/items/4321");

    router.send(Event::with_data("Select", json!({ "id": 4321 })));
    assert_eq!(history.counts(), (1, 0));
}

#[test]
fn parameter_with_reserved_characters_is_pushed_once() {
    let config = StateNodeConfig::new()
        .initial("home")
        .on(
            "Open",
            TransitionConfig::to("user").assign(|ctx: &mut Ctx, event| ctx.assign_match(event.data())),
        )
        .state("home", StateNodeConfig::new().path("/"))
        .state("user", StateNodeConfig::new().path("/users/:id"));
    let (history, router) = start_with(config, "/");

    router.send(Event::with_data("Open", json!({ "id": "a/b?c" })));

    assert_eq!(state(&router), "user");
    assert_eq!(history.pathname(), "/users/a%2Fb%3Fc");
    assert_eq!(router.context().param("id"), Some("a/b?c"));
    assert_eq!(history.counts(), (1, 0));
}

#[test]
fn action_may_update_the_history() {
    let history = CountingHistory::at("/");
    let target = Rc::clone(&history);
    let config = StateNodeConfig::new()
        .initial("home")
        .on(
            "Jump",
            TransitionConfig::stay().assign(move |_: &mut Ctx, _| target.push("/about")),
        )
        .state("home", StateNodeConfig::new().path("/"))
        .state("about", StateNodeConfig::new().path("/about"));
    let router = Router::new(RouterArgs::new(config, (), Rc::clone(&history))).unwrap();

    router.send("Jump");

    assert_eq!(state(&router), "about");
    assert_eq!(history.pathname(), "/about");
    assert_eq!(history.counts(), (1, 0));

    history.back();
    assert_eq!(state(&router), "home");
}

#[test]
fn transition_log_is_bounded() {
    let history = CountingHistory::at("/");
    let args = RouterArgs::new(machine_config(), (), Rc::clone(&history))
        .options(RouterOptions::new().log_capacity(Some(16)));
    let router = Router::new(args).unwrap();

    router.send("GoAbout");
    for _ in 0..100 {
        history.back();
        history.forward();
    }

    let log = router.service().log();
    assert_eq!(log.len(), 16);
    assert_eq!(log.path().last(), Some(&&StateAddress::parse("about")));
    assert_eq!(history.counts(), (1, 0));
}

#[test]
fn back_and_forward_never_push() {
    let (history, router) = start("/");

    router.send("GoAbout");
    router.send(Event::with_data("GoSubstateC", json!({ "param": 817 })));
    assert_eq!(history.counts(), (2, 0));

    history.back();
    assert_eq!(state(&router), "about");
    history.back();
    assert_eq!(state(&router), "home");
    history.forward();
    assert_eq!(state(&router), "about");
    history.forward();
    assert_eq!(state(&router), "substate.c");
    assert_eq!(router.context().param("param"), Some("817"));

    assert_eq!(history.counts(), (2, 0));
}

#[test]
fn transition_log_tracks_visited_states() {
    let (_history, router) = start("/");

    router.send("GoAbout");

    let log = router.service().log();
    assert_eq!(log.path().last(), Some(&&StateAddress::parse("about")));
}

#[test]
fn malformed_routes_are_reported_together() {
    let config: StateNodeConfig<Ctx> = StateNodeConfig::new()
        .initial("ok")
        .state("ok", StateNodeConfig::new().path("/ok"))
        .state("bad", StateNodeConfig::new().path("/bad/:"))
        .state("worse", StateNodeConfig::new().path("/worse/(x"));

    let result = Router::new(RouterArgs::new(config, (), CountingHistory::at("/")));

    match result {
        Err(RouterError::MalformedRoutes(errors)) => assert_eq!(errors.len(), 2),
        Err(other) => panic!("expected malformed routes, got {other}"),
        Ok(_) => panic!("expected malformed routes"),
    }
}

#[test]
fn unknown_target_is_a_build_error() {
    let config: StateNodeConfig<Ctx> = StateNodeConfig::new()
        .initial("home")
        .on("Go", TransitionConfig::to("missing"))
        .state("home", StateNodeConfig::new().path("/"));

    let result = Router::new(RouterArgs::new(config, (), CountingHistory::at("/")));

    assert!(matches!(result, Err(RouterError::Build(_))));
}

#[test]
fn case_sensitive_option_is_applied() {
    let config = StateNodeConfig::new()
        .initial("home")
        .state("home", StateNodeConfig::new().path("/"))
        .state("about", StateNodeConfig::new().path("/about"));
    let history = CountingHistory::at("/ABOUT");
    let args = RouterArgs::new(config, (), Rc::clone(&history))
        .options(RouterOptions::new().sensitive(true));

    let router = Router::new(args).unwrap();

    assert_eq!(router.state().to_string(), "home");
}
