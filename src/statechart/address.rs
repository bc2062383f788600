//! State addresses: the path of state names from the root to a node.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered sequence of state names from the root to a state node.
///
/// The root itself has the empty address. Addresses display dotted
/// (`substate.c`), the root displays as `(machine)`.
///
/// # Example
///
/// ```rust
/// use mindset_router::statechart::StateAddress;
///
/// let address = StateAddress::parse("substate.c");
/// assert_eq!(address.segments(), ["substate", "c"]);
/// assert!(address.starts_with(&StateAddress::parse("substate")));
/// assert_eq!(address.to_string(), "substate.c");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateAddress(Vec<String>);

impl StateAddress {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The root's address.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted address. Empty segments are ignored, so `""` is the root.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.').filter(|s| !s.is_empty()))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Address of a direct child.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// True when `ancestor` is this address or one of its ancestors.
    pub fn starts_with(&self, ancestor: &StateAddress) -> bool {
        self.0.starts_with(&ancestor.0)
    }
}

impl fmt::Display for StateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("(machine)")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

impl From<&str> for StateAddress {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}
