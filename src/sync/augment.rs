//! Injection of the synchronization reactions into a state configuration.

use super::context::RoutedContext;
use crate::navigation::History;
use crate::routes::{resolve, RouteTable};
use crate::statechart::{Event, StateNodeConfig, TransitionConfig, ROUTE_CHANGED};
use std::rc::Rc;

/// Return a copy of `config` whose root reacts to [`ROUTE_CHANGED`].
///
/// Root handlers the application already declared for the event come
/// first. Then, in order:
/// 1. a refresh reaction for machine-originated changes that re-reads the
///    location and re-resolves `matched` without changing state;
/// 2. one reaction per route, in table order, for history-originated
///    changes naming that route: enter the route's state and store the
///    location and its parameters.
///
/// The input is left untouched. Handlers on non-root states are kept and,
/// being closer to the active leaf, can intercept the event.
pub fn add_router_events<A, H>(
    history: &Rc<H>,
    config: &StateNodeConfig<RoutedContext<A>>,
    routes: &Rc<RouteTable>,
) -> StateNodeConfig<RoutedContext<A>>
where
    A: 'static,
    H: History + 'static,
{
    let mut augmented = config.clone();
    let mut handlers = config.handlers(ROUTE_CHANGED).to_vec();

    let refresh_history = Rc::clone(history);
    let refresh_routes = Rc::clone(routes);
    handlers.push(
        TransitionConfig::stay()
            .when(|_, event: &Event| event.as_route_changed().is_some_and(|e| e.is_refresh()))
            .assign(move |ctx: &mut RoutedContext<A>, _| {
                ctx.location = refresh_history.location();
                ctx.matched = resolve(&refresh_routes, &ctx.location, false);
            }),
    );

    for (index, route) in routes.routes().iter().enumerate() {
        let template = route.path.clone();
        let route_history = Rc::clone(history);
        let route_table = Rc::clone(routes);
        handlers.push(
            TransitionConfig::to_address(route.address.clone())
                .when(move |_, event: &Event| {
                    event
                        .as_route_changed()
                        .is_some_and(|e| e.is_route(&template))
                })
                .assign(move |ctx: &mut RoutedContext<A>, _| {
                    ctx.location = route_history.location();
                    ctx.matched = route_table.match_route(index, &ctx.location);
                }),
        );
    }

    augmented.set_handlers(ROUTE_CHANGED, handlers);
    augmented
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterOptions;
    use crate::navigation::{Location, MemoryHistory};
    use crate::statechart::{Interpreter, Machine, SyncOrigin};

    type Ctx = RoutedContext<()>;

    fn config() -> StateNodeConfig<Ctx> {
        StateNodeConfig::new()
            .initial("home")
            .on(
                ROUTE_CHANGED,
                TransitionConfig::stay()
                    .when(|_, event: &Event| event.as_route_changed().is_some_and(|e| e.is_route("/legacy"))),
            )
            .state("home", StateNodeConfig::new().path("/"))
            .state("user", StateNodeConfig::new().path("/users/:id"))
            .state("legacy", StateNodeConfig::new().path("/legacy"))
    }

    fn setup(path: &str) -> (Rc<MemoryHistory>, Interpreter<Ctx>) {
        let history = Rc::new(MemoryHistory::at(path));
        let config = config();
        let routes = Rc::new(RouteTable::from_config(&config, &RouterOptions::default()).unwrap());
        let augmented = add_router_events(&history, &config, &routes);
        let machine = Machine::new(&augmented).unwrap();
        let service = Interpreter::new(machine, RoutedContext::new((), Location::default(), None));
        service.start();
        (history, service)
    }

    #[test]
    fn input_config_is_not_modified() {
        let history = Rc::new(MemoryHistory::new());
        let config = config();
        let routes = Rc::new(RouteTable::from_config(&config, &RouterOptions::default()).unwrap());

        let augmented = add_router_events(&history, &config, &routes);

        assert_eq!(config.handlers(ROUTE_CHANGED).len(), 1);
        // existing + refresh + one per route
        assert_eq!(augmented.handlers(ROUTE_CHANGED).len(), 1 + 1 + 3);
        assert!(augmented.handlers(ROUTE_CHANGED).iter().all(|t| t.is_guarded()));
    }

    #[test]
    fn history_change_enters_route_state_with_params() {
        let (_history, service) = setup("/users/42");

        service.send(Event::route_changed(SyncOrigin::History, Some("/users/:id".to_string())));

        assert!(service.matches("user"));
        service.with_context(|ctx| {
            assert_eq!(ctx.location.pathname, "/users/42");
            assert_eq!(ctx.param("id"), Some("42"));
        });
    }

    #[test]
    fn refresh_updates_context_without_moving() {
        let (history, service) = setup("/");
        history.push("/users/7");

        let snapshot = service.send(Event::route_changed(SyncOrigin::Machine, Some("/".to_string())));

        assert!(snapshot.changed);
        assert!(service.matches("home"));
        assert_eq!(service.with_context(|ctx| ctx.param("id").map(str::to_string)), Some("7".to_string()));
    }

    #[test]
    fn existing_root_handlers_take_precedence() {
        let (_history, service) = setup("/legacy");

        service.send(Event::route_changed(SyncOrigin::History, Some("/legacy".to_string())));

        assert!(service.matches("home"));
    }
}
