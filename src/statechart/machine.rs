//! Static state tree built from a [`StateNodeConfig`].
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]; parent
//! links make ancestor walks plain loops.

use super::address::StateAddress;
use super::config::{Action, RouteMeta, StateNodeConfig, Target};
use super::error::BuildError;
use super::event::Event;
use super::guard::Guard;
use std::collections::HashSet;

/// Index of a node inside its [`Machine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A transition with its target resolved to a node.
pub(crate) struct Transition<C> {
    pub(crate) target: Option<NodeId>,
    pub(crate) guard: Option<Guard<C>>,
    pub(crate) actions: Vec<Action<C>>,
}

impl<C> Transition<C> {
    fn enabled(&self, context: &C, event: &Event) -> bool {
        self.guard.as_ref().map_or(true, |g| g.check(context, event))
    }
}

/// A node of the state tree.
pub struct StateNode<C> {
    key: String,
    address: StateAddress,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    initial: Option<NodeId>,
    meta: Option<RouteMeta>,
    on: Vec<(String, Vec<Transition<C>>)>,
}

impl<C> StateNode<C> {
    /// Name of the node within its parent; empty for the root.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn address(&self) -> &StateAddress {
        &self.address
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn meta(&self) -> Option<&RouteMeta> {
        self.meta.as_ref()
    }

    /// The path template this node declares itself, if any.
    pub fn path(&self) -> Option<&str> {
        self.meta.as_ref().map(|meta| meta.path.as_str())
    }

    fn handlers(&self, event: &str) -> &[Transition<C>] {
        self.on
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, handlers)| handlers.as_slice())
            .unwrap_or(&[])
    }
}

/// An immutable, validated state tree.
///
/// # Example
///
/// ```rust
/// use mindset_router::statechart::{Machine, StateAddress, StateNodeConfig};
///
/// let config: StateNodeConfig<()> = StateNodeConfig::new()
///     .initial("substate")
///     .state(
///         "substate",
///         StateNodeConfig::new()
///             .path("/substate")
///             .initial("b")
///             .state("b", StateNodeConfig::new()),
///     );
///
/// let machine = Machine::new(&config).unwrap();
/// let leaf = machine.initial_leaf(machine.root());
/// assert_eq!(machine.node(leaf).address(), &StateAddress::parse("substate.b"));
/// assert_eq!(machine.find_path_recursive(leaf), Some("/substate"));
/// ```
pub struct Machine<C> {
    nodes: Vec<StateNode<C>>,
}

impl<C> Machine<C> {
    /// Build and validate the tree. Every initial child and transition
    /// target must exist.
    pub fn new(config: &StateNodeConfig<C>) -> Result<Self, BuildError> {
        let mut nodes = Vec::new();
        let mut configs = Vec::new();
        allocate(config, "", StateAddress::root(), None, &mut nodes, &mut configs)?;

        for (index, node_config) in configs.iter().enumerate() {
            let initial = match node_config.initial_state() {
                Some(name) => Some(child_named(&nodes, NodeId(index), name).ok_or_else(|| {
                    BuildError::UnknownInitial {
                        state: nodes[index].address.to_string(),
                        initial: name.to_string(),
                    }
                })?),
                None if !nodes[index].children.is_empty() => {
                    return Err(BuildError::MissingInitial {
                        state: nodes[index].address.to_string(),
                    });
                }
                None => None,
            };

            let mut on = Vec::new();
            for (event, candidates) in node_config.events() {
                let mut resolved = Vec::with_capacity(candidates.len());
                for candidate in candidates {
                    let target = match candidate.target() {
                        Some(target) => Some(resolve_target(&nodes, NodeId(index), target).ok_or_else(
                            || BuildError::UnknownTarget {
                                state: nodes[index].address.to_string(),
                                event: event.to_string(),
                                target: describe(target),
                            },
                        )?),
                        None => None,
                    };
                    resolved.push(Transition {
                        target,
                        guard: candidate.guard.clone(),
                        actions: candidate.actions.clone(),
                    });
                }
                on.push((event.to_string(), resolved));
            }

            let node = &mut nodes[index];
            node.initial = initial;
            node.on = on;
        }

        Ok(Self { nodes })
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &StateNode<C> {
        &self.nodes[id.0]
    }

    /// All nodes in pre-order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &StateNode<C>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn node_by_address(&self, address: &StateAddress) -> Option<NodeId> {
        descend(&self.nodes, self.root(), address)
    }

    /// Follow initial children down to a leaf.
    pub fn initial_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(initial) = self.node(current).initial {
            current = initial;
        }
        current
    }

    /// Nearest path template declared by `id` or one of its ancestors,
    /// excluding the root.
    pub fn find_path_recursive(&self, id: NodeId) -> Option<&str> {
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            if let Some(path) = self.node(current).path() {
                return Some(path);
            }
            current = parent;
        }
        None
    }

    /// True when `active` is the node at `address` or one of its descendants.
    pub fn matches_state(&self, active: NodeId, address: &StateAddress) -> bool {
        self.node(active).address.starts_with(address)
    }

    /// First enabled candidate for `event`, searching from `active` up to
    /// the root. Within a node, candidates are tried in declaration order.
    pub(crate) fn select(&self, active: NodeId, context: &C, event: &Event) -> Option<&Transition<C>> {
        let mut current = Some(active);
        while let Some(id) = current {
            let node = self.node(id);
            if let Some(transition) = node
                .handlers(event.name())
                .iter()
                .find(|t| t.enabled(context, event))
            {
                return Some(transition);
            }
            current = node.parent;
        }
        None
    }
}

fn allocate<'a, C>(
    config: &'a StateNodeConfig<C>,
    key: &str,
    address: StateAddress,
    parent: Option<NodeId>,
    nodes: &mut Vec<StateNode<C>>,
    configs: &mut Vec<&'a StateNodeConfig<C>>,
) -> Result<NodeId, BuildError> {
    let id = NodeId(nodes.len());
    nodes.push(StateNode {
        key: key.to_string(),
        address: address.clone(),
        parent,
        children: Vec::new(),
        initial: None,
        meta: config.route_meta().cloned(),
        on: Vec::new(),
    });
    configs.push(config);

    let mut seen = HashSet::new();
    for (name, child) in config.children() {
        if !seen.insert(name) {
            return Err(BuildError::DuplicateState {
                state: address.to_string(),
                child: name.to_string(),
            });
        }
        let child_id = allocate(child, name, address.child(name), Some(id), nodes, configs)?;
        nodes[id.0].children.push(child_id);
    }
    Ok(id)
}

fn child_named<C>(nodes: &[StateNode<C>], parent: NodeId, name: &str) -> Option<NodeId> {
    nodes[parent.0]
        .children
        .iter()
        .copied()
        .find(|child| nodes[child.0].key == name)
}

fn descend<C>(nodes: &[StateNode<C>], from: NodeId, address: &StateAddress) -> Option<NodeId> {
    address
        .segments()
        .iter()
        .try_fold(from, |current, segment| child_named(nodes, current, segment))
}

fn resolve_target<C>(nodes: &[StateNode<C>], source: NodeId, target: &Target) -> Option<NodeId> {
    match target {
        Target::Relative(address) => {
            let base = nodes[source.0].parent.unwrap_or(source);
            descend(nodes, base, address)
        }
        Target::Absolute(address) => descend(nodes, NodeId(0), address),
    }
}

fn describe(target: &Target) -> String {
    match target {
        Target::Relative(address) => address.to_string(),
        Target::Absolute(address) => format!("#{address}"),
    }
}
