// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_host_tree --heading-base-level=0

//! Trellis Host Tree: an explicit model of a native shell's container hierarchy.
//!
//! ## Overview
//!
//! Application shells that embed a web-rendering surface rarely expose a stable
//! accessor to it. The surface sits somewhere inside an opaque, arbitrarily
//! nested container hierarchy, and the only portable way to reach it is to
//! search. This crate replaces that opaque hierarchy with an explicit tree
//! abstraction so the search order and termination are independent of concrete
//! host container types:
//!
//! - [`HostTree`] is a generational arena the embedder mirrors the host
//!   hierarchy into. Nodes carry a declared type name, visibility and
//!   surface-capability [`NodeFlags`], children in insertion order, and named
//!   property edges (the explicit stand-in for reflective field access on host
//!   objects). Surface nodes additionally carry an embedder-supplied payload.
//! - [`ContainerTree`] is the read-only view the search operates on, so hosts
//!   that already have a tree of their own can adapt it instead of mirroring.
//! - [`Locator`] finds the embedded rendering surface: a marker-guided
//!   property probe over recognized container type names, then a structural
//!   depth-first fallback over visible children.
//!
//! ## Identifiers and liveness
//!
//! [`NodeId`]s are generational: removing a node (or its ancestor) leaves old
//! identifiers stale rather than dangling, and every accessor answers `None`
//! or `false` for a stale id. A stored [`NodeId`] therefore behaves like a
//! weak reference to a host object that may be destroyed at any time.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_host_tree::{Container, HostTree, Locator};
//!
//! let mut tree: HostTree<()> = HostTree::new();
//! let root = tree.insert(None, Container::new("RootWindow"));
//! let shell = tree.insert(Some(root), Container::new("BridgeViewController"));
//! let surface = tree.insert_surface(Some(shell), Container::new("WebSurface"), ());
//! tree.set_property(shell, "webView", surface);
//!
//! let found = Locator::new().locate(&tree);
//! assert_eq!(found, Some(surface));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod locator;
mod tree;
mod types;

pub use locator::{DEFAULT_HOST_MARKERS, DEFAULT_SURFACE_FIELDS, Locator};
pub use tree::{ContainerTree, HostTree};
pub use types::{Container, NodeFlags, NodeId};
