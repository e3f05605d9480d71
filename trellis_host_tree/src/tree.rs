// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, read-only views.

use alloc::string::String;
use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::types::{Container, NodeFlags, NodeId};

/// Read-only view of a host container hierarchy.
///
/// The [`Locator`](crate::Locator) is written against this trait so that
/// embedders with an existing scene or widget tree can adapt it directly
/// instead of mirroring into a [`HostTree`]. Implementations must report
/// children in insertion order; the surface search depends on that order.
///
/// `property` is the explicit stand-in for runtime reflection on opaque host
/// objects: a named edge from a container to a node that is not necessarily
/// among its visual children (for example a shell controller holding a
/// reference to the surface it manages).
pub trait ContainerTree<K> {
    /// The current top-level container, if any.
    fn root(&self) -> Option<K>;

    /// Whether `key` refers to a live node.
    fn is_alive(&self, key: &K) -> bool;

    /// Children of `key`, in insertion order. Empty for leaves and stale keys.
    fn children_of(&self, key: &K) -> Vec<K>;

    /// Declared type name of `key`, or `None` for stale keys.
    fn type_name(&self, key: &K) -> Option<&str>;

    /// Whether `key` is live and visible.
    fn is_visible(&self, key: &K) -> bool;

    /// Whether `key` is live and carries the rendering-surface capability.
    fn is_surface(&self, key: &K) -> bool;

    /// Look up a named property edge on `key`.
    fn property(&self, key: &K, field: &str) -> Option<K>;
}

#[derive(Debug)]
struct Node<S> {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    container: Container,
    // Named edges; most containers carry zero or one.
    props: SmallVec<[(String, NodeId); 2]>,
    payload: Option<S>,
}

impl<S> Node<S> {
    fn new(generation: u32, container: Container, payload: Option<S>) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            container,
            props: SmallVec::new(),
            payload,
        }
    }
}

/// A generational arena mirroring the host's container hierarchy.
///
/// The type parameter `S` is the per-surface payload the embedder attaches to
/// rendering-surface nodes via [`HostTree::insert_surface`]; plain containers
/// carry none. Identifiers are generational: removal leaves old [`NodeId`]s
/// stale, and every accessor answers `None`/`false`/empty for stale ids, so a
/// stored id degrades gracefully when the host destroys the object behind it.
///
/// ## Example
///
/// ```rust
/// use trellis_host_tree::{Container, HostTree};
///
/// let mut tree: HostTree<&'static str> = HostTree::new();
/// let root = tree.insert(None, Container::new("RootWindow"));
/// let surface = tree.insert_surface(Some(root), Container::new("WebSurface"), "doc");
///
/// assert_eq!(tree.surface(surface), Some(&"doc"));
/// tree.remove(surface);
/// assert_eq!(tree.surface(surface), None);
/// ```
pub struct HostTree<S> {
    /// slots
    nodes: Vec<Option<Node<S>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl<S> core::fmt::Debug for HostTree<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("HostTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<S> Default for HostTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HostTree<S> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new container as a child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, container: Container) -> NodeId {
        self.insert_node(parent, container, None)
    }

    /// Insert a rendering-surface node carrying an embedder payload.
    ///
    /// The node gets [`NodeFlags::SURFACE`] in addition to whatever flags the
    /// container declares.
    pub fn insert_surface(
        &mut self,
        parent: Option<NodeId>,
        mut container: Container,
        payload: S,
    ) -> NodeId {
        container.flags |= NodeFlags::SURFACE;
        self.insert_node(parent, container, Some(payload))
    }

    fn insert_node(
        &mut self,
        parent: Option<NodeId>,
        container: Container,
        payload: Option<S>,
    ) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, container, payload));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, container, payload)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node (and its subtree) from the tree.
    ///
    /// The removed identifiers become stale immediately. Property edges held
    /// by other nodes that pointed into the removed subtree are not rewritten;
    /// they go stale through the generation check instead.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_live(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Update a node's visibility.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.container.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Set (or replace) a named property edge on `owner`.
    pub fn set_property(&mut self, owner: NodeId, field: &str, target: NodeId) {
        if let Some(n) = self.node_opt_mut(owner) {
            if let Some(slot) = n.props.iter_mut().find(|(name, _)| name == field) {
                slot.1 = target;
            } else {
                n.props.push((String::from(field), target));
            }
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation
    /// matches the current generation stored in that slot.
    pub fn is_live(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.container.flags)
    }

    /// Get the children of a node, or empty slice if the node is stale.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Shared access to a surface node's payload.
    pub fn surface(&self, id: NodeId) -> Option<&S> {
        self.node_opt(id).and_then(|n| n.payload.as_ref())
    }

    /// Exclusive access to a surface node's payload.
    pub fn surface_mut(&mut self, id: NodeId) -> Option<&mut S> {
        self.node_opt_mut(id).and_then(|n| n.payload.as_mut())
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node<S> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node<S> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node<S>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<S>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

impl<S> ContainerTree<NodeId> for HostTree<S> {
    fn root(&self) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(i, n)| match n {
            Some(n) if n.parent.is_none() =>
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId uses 32-bit indices by design."
                )]
                Some(NodeId::new(i as u32, n.generation))
            }
            _ => None,
        })
    }

    fn is_alive(&self, key: &NodeId) -> bool {
        self.is_live(*key)
    }

    fn children_of(&self, key: &NodeId) -> Vec<NodeId> {
        self.children(*key).to_vec()
    }

    fn type_name(&self, key: &NodeId) -> Option<&str> {
        self.node_opt(*key).map(|n| n.container.type_name.as_str())
    }

    fn is_visible(&self, key: &NodeId) -> bool {
        self.flags(*key)
            .is_some_and(|f| f.contains(NodeFlags::VISIBLE))
    }

    fn is_surface(&self, key: &NodeId) -> bool {
        self.flags(*key)
            .is_some_and(|f| f.contains(NodeFlags::SURFACE))
    }

    fn property(&self, key: &NodeId, field: &str) -> Option<NodeId> {
        self.node_opt(*key).and_then(|n| {
            n.props
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, target)| *target)
        })
    }
}
