//! Mindset Router: keeps a hierarchical state machine and a navigation
//! history in sync.
//!
//! Transitioning the machine updates the URL; navigating the URL (back,
//! forward, direct load) drives the machine into the matching state.
//! Each side's echo of a change the router caused itself is suppressed
//! once, so updates never bounce back and forth.
//!
//! # Core Concepts
//!
//! - **Routes**: any state may declare a path template (`/users/:id`,
//!   `(.*)`). Routes are collected in pre-order and the first match wins.
//! - **Statechart**: a small hierarchical machine with guarded transitions
//!   and context actions, interpreted synchronously.
//! - **History**: anything implementing [`History`]; [`MemoryHistory`]
//!   is included.
//! - **Router**: the controller tying the two together.
//!
//! # Example
//!
//! ```rust
//! use mindset_router::{History, MemoryHistory, Router, RouterArgs};
//! use mindset_router::statechart::{Event, StateNodeConfig, TransitionConfig};
//! use mindset_router::sync::RoutedContext;
//! use serde_json::json;
//! use std::rc::Rc;
//!
//! let config = StateNodeConfig::new()
//!     .initial("home")
//!     .on(
//!         "OpenUser",
//!         TransitionConfig::to("user")
//!             .assign(|ctx: &mut RoutedContext<()>, event| ctx.assign_match(event.data())),
//!     )
//!     .state("home", StateNodeConfig::new().path("/"))
//!     .state("user", StateNodeConfig::new().path("/users/:id"))
//!     .state("notFound", StateNodeConfig::new().path("(.*)"));
//!
//! let history = Rc::new(MemoryHistory::at("/users/816"));
//! let router = Router::new(RouterArgs::new(config, (), Rc::clone(&history))).unwrap();
//! assert!(router.matches("user"));
//! assert_eq!(router.context().param("id"), Some("816"));
//!
//! router.send(Event::with_data("OpenUser", json!({ "id": 817 })));
//! assert_eq!(history.location().pathname, "/users/817");
//!
//! history.push("/does/not/exist");
//! assert!(router.matches("notFound"));
//! ```

pub mod config;
pub mod error;
pub mod navigation;
pub mod pattern;
pub mod routes;
pub mod statechart;
pub mod sync;

// Re-export commonly used types
pub use config::RouterOptions;
pub use error::RouterError;
pub use navigation::{History, Location, MemoryHistory, NavigationAction};
pub use pattern::{build_uri, match_uri, Params, PathPattern, PatternError};
pub use routes::{get_routes, resolve, Route, RouteTable};
pub use statechart::{Event, Interpreter, Machine, StateNodeConfig, TransitionConfig, ROUTE_CHANGED};
pub use sync::{add_router_events, router_machine, RoutedContext, Router, RouterArgs, SyncPhase};
