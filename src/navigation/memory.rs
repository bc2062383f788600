//! In-memory history stack.

use super::{History, ListenerId, Location, LocationListener, NavigationAction};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use tracing::trace;

struct Stack {
    entries: Vec<Location>,
    index: usize,
}

/// History kept in memory, with back/forward support.
///
/// # Example
///
/// ```rust
/// use mindset_router::navigation::{History, MemoryHistory};
///
/// let history = MemoryHistory::at("/");
/// history.push("/about");
/// history.push("/substate");
/// history.back();
///
/// assert_eq!(history.location().pathname, "/about");
/// assert_eq!(history.len(), 3);
///
/// history.push("/contact");
/// assert_eq!(history.len(), 3); // forward entry dropped
/// ```
pub struct MemoryHistory {
    stack: RefCell<Stack>,
    listeners: RefCell<Vec<(ListenerId, LocationListener)>>,
    next_listener: Cell<u64>,
}

impl MemoryHistory {
    /// History with a single `/` entry.
    pub fn new() -> Self {
        Self::at("/")
    }

    /// History with a single entry.
    pub fn at(path: &str) -> Self {
        Self::with_entries([path], 0)
    }

    /// History over several entries, positioned at `index` (clamped).
    /// An empty list behaves like [`MemoryHistory::new`].
    pub fn with_entries<I, S>(entries: I, index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<Location> = entries
            .into_iter()
            .map(|path| Location::parse(path.as_ref()))
            .collect();
        if entries.is_empty() {
            entries.push(Location::default());
        }
        let index = index.min(entries.len() - 1);
        Self {
            stack: RefCell::new(Stack { entries, index }),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    /// Push with opaque navigation state attached.
    pub fn push_with_state(&self, path: &str, state: Value) {
        self.push_location(Location::parse(path).with_state(state));
    }

    /// Move `delta` entries (negative is back). Out-of-range moves are
    /// clamped; a move that lands on the current entry notifies nobody.
    pub fn go(&self, delta: isize) {
        let moved = {
            let mut stack = self.stack.borrow_mut();
            let last = stack.entries.len() - 1;
            let target = stack.index.saturating_add_signed(delta).min(last);
            let moved = target != stack.index;
            stack.index = target;
            moved
        };
        if moved {
            self.notify(NavigationAction::Pop);
        }
    }

    pub fn back(&self) {
        self.go(-1);
    }

    pub fn forward(&self) {
        self.go(1);
    }

    pub fn can_go(&self, delta: isize) -> bool {
        let stack = self.stack.borrow();
        stack
            .index
            .checked_add_signed(delta)
            .is_some_and(|target| target < stack.entries.len())
    }

    pub fn entries(&self) -> Vec<Location> {
        self.stack.borrow().entries.clone()
    }

    pub fn index(&self) -> usize {
        self.stack.borrow().index
    }

    pub fn len(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.borrow().entries.is_empty()
    }

    fn push_location(&self, location: Location) {
        {
            let mut stack = self.stack.borrow_mut();
            let keep = stack.index + 1;
            stack.entries.truncate(keep);
            stack.entries.push(location);
            stack.index = keep;
        }
        self.notify(NavigationAction::Push);
    }

    fn notify(&self, action: NavigationAction) {
        let location = self.location();
        trace!(%location, ?action, "history changed");
        let listeners: Vec<LocationListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&location, action);
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        let stack = self.stack.borrow();
        stack.entries[stack.index].clone()
    }

    fn push(&self, path: &str) {
        self.push_location(Location::parse(path));
    }

    fn replace(&self, path: &str) {
        {
            let mut stack = self.stack.borrow_mut();
            let index = stack.index;
            stack.entries[index] = Location::parse(path);
        }
        self.notify(NavigationAction::Replace);
    }

    fn listen(&self, listener: LocationListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}
