//! Navigation history: the URL side of synchronization.
//!
//! [`History`] is the seam the router talks to. Browser integrations
//! implement it over the platform history; [`MemoryHistory`] keeps the
//! stack in memory for tests, servers and non-browser hosts.

mod memory;

pub use memory::MemoryHistory;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// A position in the navigation history.
///
/// Only `pathname` takes part in route matching; `state` is opaque data
/// attached by whoever navigated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub state: Option<Value>,
}

impl Location {
    /// Split a path into pathname, `?search` and `#hash`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mindset_router::navigation::Location;
    ///
    /// let location = Location::parse("/substate/816/c?tab=2#top");
    /// assert_eq!(location.pathname, "/substate/816/c");
    /// assert_eq!(location.search, "?tab=2");
    /// assert_eq!(location.hash, "#top");
    /// assert_eq!(location.to_string(), "/substate/816/c?tab=2#top");
    /// ```
    pub fn parse(path: &str) -> Self {
        let (rest, hash) = match path.find('#') {
            Some(i) => (&path[..i], &path[i..]),
            None => (path, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        Self {
            pathname: if pathname.is_empty() {
                "/".to_string()
            } else {
                pathname.to_string()
            },
            search: search.to_string(),
            hash: hash.to_string(),
            state: None,
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::parse("/")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// How the current location was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationAction {
    Push,
    Replace,
    /// Moved through existing entries (back, forward, go).
    Pop,
}

/// Handle returned by [`History::listen`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Callback invoked after every location change.
pub type LocationListener = Rc<dyn Fn(&Location, NavigationAction)>;

/// A navigation history the router can read and drive.
///
/// Implementations notify listeners after the location has changed, so
/// [`History::location`] already returns the new location inside a
/// listener. Listeners may call back into the history.
pub trait History {
    /// The current location.
    fn location(&self) -> Location;

    /// Add a new entry on top of the current one, dropping forward entries.
    fn push(&self, path: &str);

    /// Overwrite the current entry.
    fn replace(&self, path: &str);

    fn listen(&self, listener: LocationListener) -> ListenerId;

    fn unlisten(&self, id: ListenerId);
}
