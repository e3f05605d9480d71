// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the host tree: node identifiers, flags, and container data.

use alloc::string::String;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and the rendering-surface capability.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in the structural surface search).
        const VISIBLE = 0b0000_0001;
        /// Node is an embedded rendering surface (hosts a scriptable document).
        const SURFACE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Local data for a container node.
///
/// The `type_name` is the container's declared type as reported by the host
/// framework (for example `"BridgeViewController"` or `"TabGroup"`). The
/// [`Locator`](crate::Locator) matches marker strings against it; the tree
/// itself attaches no meaning to it.
#[derive(Clone, Debug)]
pub struct Container {
    /// Declared type name of the container.
    pub type_name: String,
    /// Visibility and capability flags.
    pub flags: NodeFlags,
}

impl Container {
    /// Create a visible container with the given declared type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            flags: NodeFlags::default(),
        }
    }

    /// Mark this container as hidden.
    ///
    /// Hidden containers (and their subtrees) are skipped by the structural
    /// surface search, matching hosts that keep detached or invisible view
    /// branches around.
    pub fn hidden(mut self) -> Self {
        self.flags.remove(NodeFlags::VISIBLE);
        self
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new("")
    }
}
