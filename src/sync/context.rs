//! Machine context extended with routing data.

use crate::navigation::Location;
use crate::pattern::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The application's context plus the last synchronized location and the
/// parameters matched from it.
///
/// `location` and `matched` are written by the router's synchronization
/// reactions. Application actions may write `matched` before entering a
/// parameterized state; the router builds the pushed path from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutedContext<A> {
    pub app: A,
    pub location: Location,
    #[serde(rename = "match")]
    pub matched: Option<Params>,
}

impl<A> RoutedContext<A> {
    pub fn new(app: A, location: Location, matched: Option<Params>) -> Self {
        Self {
            app,
            location,
            matched,
        }
    }

    /// Captured value of a placeholder, if any.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.matched
            .as_ref()
            .and_then(|params| params.get(name))
            .and_then(Option::as_deref)
    }

    /// Set one parameter, keeping the others.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.matched
            .get_or_insert_with(Params::new)
            .insert(name.into(), Some(value.into()));
    }

    /// Replace `matched` with the scalar fields of a JSON object.
    ///
    /// Strings are taken as is, numbers and booleans are formatted and
    /// `null` becomes an absent value. Other fields are skipped.
    ///
    /// ```rust
    /// use mindset_router::navigation::Location;
    /// use mindset_router::sync::RoutedContext;
    /// use serde_json::json;
    ///
    /// let mut ctx = RoutedContext::new((), Location::default(), None);
    /// ctx.assign_match(&json!({ "param": 817, "tab": "info" }));
    /// assert_eq!(ctx.param("param"), Some("817"));
    /// assert_eq!(ctx.param("tab"), Some("info"));
    /// ```
    pub fn assign_match(&mut self, data: &Value) {
        let params: Params = data
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(key, value)| scalar(value).map(|v| (key.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();
        self.matched = Some(params);
    }
}

fn scalar(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::Bool(b) => Some(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
