// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering-surface discovery over a container hierarchy.
//!
//! ## Overview
//!
//! The locator runs two passes over the tree:
//!
//! 1. **Marker-guided probe.** Depth-first over the whole hierarchy; every
//!    container whose declared type name contains a recognized marker string
//!    has its named property edges probed, in order, for a node carrying the
//!    rendering-surface capability. The first hit is returned immediately.
//!    This pass covers hosts that keep the surface behind a field on a shell
//!    controller rather than in the visual subtree.
//! 2. **Structural fallback.** Depth-first over visible nodes only; the first
//!    node carrying the surface capability wins.
//!
//! Both passes visit children in insertion order and return the first match.
//! With several live surfaces this is a deliberate design choice: the result
//! is the first surface in traversal order, which is not necessarily the
//! visually topmost one.
//!
//! Failure has no side effects; the locator never mutates the tree.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::tree::ContainerTree;

/// Marker strings recognized in container type names during the probe pass.
///
/// These cover the embedding shells supported so far; hosts with different
/// shell naming can supply their own list via [`Locator::with_heuristics`].
pub const DEFAULT_HOST_MARKERS: &[&str] = &["BridgeViewController", "WebShell"];

/// Field names expected to hold the rendering surface on recognized host
/// containers, in probe order.
///
/// This list is the single place host-version drift shows up: shell versions
/// 4 and 5 expose `webView`/`_webView`, version 6 renamed the field to
/// `surface`. Extend it here when supporting a new host version.
pub const DEFAULT_SURFACE_FIELDS: &[&str] = &["surface", "_surface", "webView", "_webView"];

/// Finds the embedded rendering surface in a container hierarchy.
///
/// ## Example
///
/// ```rust
/// use trellis_host_tree::{Container, HostTree, Locator};
///
/// let mut tree: HostTree<()> = HostTree::new();
/// let root = tree.insert(None, Container::new("RootWindow"));
/// let surface = tree.insert_surface(Some(root), Container::new("WebSurface"), ());
///
/// // No marker matches here, so the structural fallback finds the surface.
/// assert_eq!(Locator::new().locate(&tree), Some(surface));
/// ```
#[derive(Clone, Debug)]
pub struct Locator {
    markers: Vec<String>,
    surface_fields: Vec<String>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    /// Create a locator with the default marker and field heuristics.
    pub fn new() -> Self {
        Self::with_heuristics(
            DEFAULT_HOST_MARKERS.iter().copied(),
            DEFAULT_SURFACE_FIELDS.iter().copied(),
        )
    }

    /// Create a locator with custom type-name markers and property field names.
    pub fn with_heuristics<M, F>(markers: M, surface_fields: F) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            surface_fields: surface_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Search the hierarchy from its current top-level container.
    ///
    /// Returns `None` when the tree has no root or the whole hierarchy is
    /// exhausted without a match.
    pub fn locate<K, T>(&self, tree: &T) -> Option<K>
    where
        K: Copy,
        T: ContainerTree<K>,
    {
        let root = tree.root()?;
        self.locate_from(tree, root)
    }

    /// Search the hierarchy rooted at `root`.
    pub fn locate_from<K, T>(&self, tree: &T, root: K) -> Option<K>
    where
        K: Copy,
        T: ContainerTree<K>,
    {
        if let Some(found) = self.probe_pass(tree, root) {
            return Some(found);
        }
        self.structural_pass(tree, root)
    }

    /// Pass 1: probe named properties of marker-matched containers.
    fn probe_pass<K, T>(&self, tree: &T, root: K) -> Option<K>
    where
        K: Copy,
        T: ContainerTree<K>,
    {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !tree.is_alive(&node) {
                continue;
            }
            if let Some(name) = tree.type_name(&node)
                && self.markers.iter().any(|m| name.contains(m.as_str()))
            {
                for field in &self.surface_fields {
                    if let Some(target) = tree.property(&node, field)
                        && tree.is_surface(&target)
                    {
                        return Some(target);
                    }
                }
            }
            // The `.rev()` makes the stack visit children in insertion order.
            for child in tree.children_of(&node).iter().rev() {
                stack.push(*child);
            }
        }
        None
    }

    /// Pass 2: first visible node with the surface capability wins.
    fn structural_pass<K, T>(&self, tree: &T, root: K) -> Option<K>
    where
        K: Copy,
        T: ContainerTree<K>,
    {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !tree.is_alive(&node) || !tree.is_visible(&node) {
                continue;
            }
            if tree.is_surface(&node) {
                return Some(node);
            }
            for child in tree.children_of(&node).iter().rev() {
                stack.push(*child);
            }
        }
        None
    }
}
