//! Events sent to an interpreter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved event type used to keep the machine and the history in sync.
///
/// Applications may declare handlers for it (to redirect or stop a
/// history-driven change) but must not send it for their own purposes.
pub const ROUTE_CHANGED: &str = "route-changed";

static NO_DATA: Value = Value::Null;

/// Which side caused a [`RouteChanged`] event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOrigin {
    /// The machine moved and the router pushed the new path; the event only
    /// refreshes `location`/`match` in the context.
    Machine,
    /// The history moved; the event carries the matched route template.
    History,
}

/// Payload of the reserved synchronization event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteChanged {
    pub origin: SyncOrigin,
    /// Template of the route the change refers to.
    pub route: Option<String>,
}

impl RouteChanged {
    pub fn is_refresh(&self) -> bool {
        self.origin == SyncOrigin::Machine
    }

    pub fn is_from_history(&self) -> bool {
        self.origin == SyncOrigin::History
    }

    /// True for a history-originated change whose route is `template`.
    pub fn is_route(&self, template: &str) -> bool {
        self.is_from_history() && self.route.as_deref() == Some(template)
    }
}

/// An event: either an application event with optional JSON data, or the
/// reserved synchronization event.
///
/// # Example
///
/// ```rust
/// use mindset_router::statechart::{Event, ROUTE_CHANGED, SyncOrigin};
/// use serde_json::json;
///
/// let go = Event::with_data("GoSubstateC", json!({ "param": 817 }));
/// assert_eq!(go.name(), "GoSubstateC");
/// assert_eq!(go.data()["param"], 817);
///
/// let sync = Event::route_changed(SyncOrigin::History, Some("/about".to_string()));
/// assert_eq!(sync.name(), ROUTE_CHANGED);
/// assert!(sync.as_route_changed().unwrap().is_route("/about"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Named {
        name: String,
        #[serde(default)]
        data: Value,
    },
    RouteChanged(RouteChanged),
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            data: Value::Null,
        }
    }

    pub fn with_data(name: impl Into<String>, data: Value) -> Self {
        Self::Named {
            name: name.into(),
            data,
        }
    }

    pub fn route_changed(origin: SyncOrigin, route: Option<String>) -> Self {
        Self::RouteChanged(RouteChanged { origin, route })
    }

    /// The event type handlers are keyed by.
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name, .. } => name,
            Self::RouteChanged(_) => ROUTE_CHANGED,
        }
    }

    /// Application data; `null` for the synchronization event.
    pub fn data(&self) -> &Value {
        match self {
            Self::Named { data, .. } => data,
            Self::RouteChanged(_) => &NO_DATA,
        }
    }

    pub fn as_route_changed(&self) -> Option<&RouteChanged> {
        match self {
            Self::RouteChanged(payload) => Some(payload),
            Self::Named { .. } => None,
        }
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
