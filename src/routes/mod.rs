//! Route table: which state owns which path template.
//!
//! Routes are collected from a state configuration in pre-order (a node
//! before its descendants, siblings in declaration order). That order is
//! the precedence order for resolution: the first matching route wins, so
//! a catch-all such as `(.*)` belongs last.

use crate::config::RouterOptions;
use crate::error::RouterError;
use crate::navigation::Location;
use crate::pattern::{Params, PathPattern, PatternError};
use crate::statechart::{StateAddress, StateNodeConfig};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// A routable state and its path template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub address: StateAddress,
    pub path: String,
}

impl Route {
    pub fn new(address: impl Into<StateAddress>, path: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            path: path.into(),
        }
    }
}

/// Collect every state that declares a path, in pre-order.
///
/// The root itself is never routable. States without a path are skipped
/// but their descendants are still visited.
///
/// # Example
///
/// ```rust
/// use mindset_router::routes::get_routes;
/// use mindset_router::statechart::StateNodeConfig;
///
/// let config: StateNodeConfig<()> = StateNodeConfig::new()
///     .initial("home")
///     .state("home", StateNodeConfig::new().path("/"))
///     .state(
///         "settings",
///         StateNodeConfig::new()
///             .initial("profile")
///             .state("profile", StateNodeConfig::new().path("/settings/profile")),
///     );
///
/// let routes = get_routes(&config);
/// assert_eq!(routes.len(), 2);
/// assert_eq!(routes[1].address.to_string(), "settings.profile");
/// ```
pub fn get_routes<C>(config: &StateNodeConfig<C>) -> Vec<Route> {
    let mut routes = Vec::new();
    collect(config, &StateAddress::root(), &mut routes);
    routes
}

fn collect<C>(config: &StateNodeConfig<C>, address: &StateAddress, routes: &mut Vec<Route>) {
    for (name, child) in config.children() {
        let child_address = address.child(name);
        if let Some(path) = child.path_template() {
            routes.push(Route {
                address: child_address.clone(),
                path: path.to_string(),
            });
        }
        collect(child, &child_address, routes);
    }
}

/// Routes with their compiled patterns.
///
/// Templates are compiled once, when the table is built, so malformed
/// templates surface at startup.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    patterns: Vec<PathPattern>,
    options: RouterOptions,
}

impl RouteTable {
    /// Compile every route template.
    ///
    /// All malformed templates are reported together.
    pub fn compile(routes: Vec<Route>, options: &RouterOptions) -> Result<Self, RouterError> {
        let checks: Vec<Validation<PathPattern, NonEmptyVec<PatternError>>> = routes
            .iter()
            .map(|route| match PathPattern::compile(&route.path, options) {
                Ok(pattern) => Validation::success(pattern),
                Err(e) => Validation::fail(e),
            })
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(patterns) => Ok(Self {
                routes,
                patterns,
                options: options.clone(),
            }),
            Validation::Failure(errors) => Err(RouterError::MalformedRoutes(
                errors.iter().cloned().collect(),
            )),
        }
    }

    /// Extract and compile the routes of a state configuration.
    pub fn from_config<C>(config: &StateNodeConfig<C>, options: &RouterOptions) -> Result<Self, RouterError> {
        Self::compile(get_routes(config), options)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Compiled pattern of the first route declared with `template`.
    pub fn pattern(&self, template: &str) -> Option<&PathPattern> {
        self.routes
            .iter()
            .position(|route| route.path == template)
            .map(|i| &self.patterns[i])
    }

    /// First route matching `location`, with the captured parameters.
    pub fn resolve_route(&self, location: &Location) -> Option<(&Route, Params)> {
        self.find(location, false)
            .map(|(i, params)| (&self.routes[i], params))
    }

    /// Match `location` against the route at `index` only, falling back
    /// to the normalized path like the resolver does.
    pub fn match_route(&self, index: usize, location: &Location) -> Option<Params> {
        let pattern = self.patterns.get(index)?;
        pattern.matches(&location.pathname).or_else(|| {
            if self.options.tolerant_retry {
                pattern.matches(&normalize_path(&location.pathname))
            } else {
                None
            }
        })
    }

    fn find(&self, location: &Location, handle_error: bool) -> Option<(usize, Params)> {
        let path = if handle_error {
            normalize_path(&location.pathname)
        } else {
            location.pathname.clone()
        };

        let found = self
            .patterns
            .iter()
            .enumerate()
            .find_map(|(i, pattern)| pattern.matches(&path).map(|params| (i, params)));

        match found {
            Some(hit) => Some(hit),
            None if !handle_error && self.options.tolerant_retry => {
                debug!(path = %location.pathname, "no route matched, retrying with normalized path");
                self.find(location, true)
            }
            None => None,
        }
    }
}

/// Parameters of the first route matching `location`.
///
/// When nothing matches and `handle_error` is false, a second pass runs
/// once against the normalized path (see [`RouterOptions::tolerant_retry`]).
/// That pass never retries again.
///
/// # Example
///
/// ```rust
/// use mindset_router::navigation::Location;
/// use mindset_router::routes::{resolve, Route, RouteTable};
/// use mindset_router::RouterOptions;
///
/// let table = RouteTable::compile(
///     vec![
///         Route::new("user", "/users/:id"),
///         Route::new("any", "(.*)"),
///     ],
///     &RouterOptions::default(),
/// )
/// .unwrap();
///
/// let params = resolve(&table, &Location::parse("/users/9"), false).unwrap();
/// assert_eq!(params["id"].as_deref(), Some("9"));
/// ```
pub fn resolve(routes: &RouteTable, location: &Location, handle_error: bool) -> Option<Params> {
    routes.find(location, handle_error).map(|(_, params)| params)
}

/// Collapse repeated `/`, drop a trailing `/` (except for the root) and
/// strip any query or fragment.
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let segments: Vec<&str> = path[..end].split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}
