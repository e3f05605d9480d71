// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_harness --heading-base-level=0

//! Trellis Harness: deterministic fixtures for exercising the bridge.
//!
//! Real embedders answer script evaluations from a live document and mirror a
//! real container hierarchy. Tests and demos need neither: [`DocumentFixture`]
//! plays the document (scripted selection state, FIFO answers, recorded
//! scripts, optional injected failure), and [`ShellFixture`] builds the kind
//! of shell hierarchy the locator is designed to search.
//!
//! ```rust
//! use trellis_bridge::{AcquisitionState, BridgeConfig, SelectionBridge, SurfaceAccess};
//! use trellis_harness::{DocumentFixture, ShellFixture};
//! use trellis_host_tree::NodeId;
//!
//! let mut fixture = ShellFixture::new();
//! let surface = fixture.attach_surface();
//!
//! let mut bridge: SelectionBridge<NodeId> = SelectionBridge::new(BridgeConfig::default());
//! bridge.begin(0);
//! assert_eq!(bridge.tick(2000, &mut fixture.tree), AcquisitionState::Installed);
//!
//! // Answer the bridging-script injection.
//! let mut doc = DocumentFixture::new();
//! doc.pump(fixture.tree.slot_mut(&surface).unwrap());
//! assert_eq!(doc.evaluated().len(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use trellis_bridge::SurfaceSlot;
use trellis_host_tree::{Container, HostTree, NodeId};
use trellis_script::{SELECTION_QUERY, ScriptError, ScriptValue};

/// Scripted stand-in for the hosted document.
///
/// Evaluations queued on a [`SurfaceSlot`] are answered in FIFO order:
/// the selection query gets the scripted selection (empty when none is set),
/// everything else gets `Null`. Every answered script is recorded for
/// inspection, and a single upcoming evaluation can be made to fail.
#[derive(Debug, Default)]
pub struct DocumentFixture {
    selection: Option<String>,
    fail_next: bool,
    evaluated: Vec<String>,
}

impl DocumentFixture {
    /// Create a fixture with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the document's live selection.
    pub fn set_selection(&mut self, text: impl Into<String>) {
        self.selection = Some(text.into());
    }

    /// Clear the document's selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Make the next answered evaluation fail.
    pub fn fail_next_evaluation(&mut self) {
        self.fail_next = true;
    }

    /// Every script answered so far, in order.
    pub fn evaluated(&self) -> &[String] {
        &self.evaluated
    }

    /// Answer the slot's pending evaluations until none remain.
    ///
    /// Evaluations enqueued by completion callbacks (for example a delivery
    /// following a selection read) are answered in the same pass. Returns the
    /// number of evaluations answered.
    pub fn pump(&mut self, slot: &mut SurfaceSlot) -> usize {
        let mut answered = 0;
        while let Some(script) = slot.peek_script().map(String::from) {
            self.evaluated.push(script.clone());
            let result = if core::mem::take(&mut self.fail_next) {
                Err(ScriptError::new("simulated evaluation failure"))
            } else if script == SELECTION_QUERY {
                Ok(ScriptValue::Text(
                    self.selection.clone().unwrap_or_default(),
                ))
            } else {
                Ok(ScriptValue::Null)
            };
            slot.complete_next(result);
            answered += 1;
        }
        answered
    }
}

/// A shell-like container hierarchy for locator and bridge tests.
///
/// `new` builds `RootWindow → TabGroup → AppBridgeViewController` with no
/// surface, which is what a host looks like before it finishes initializing.
/// [`Self::attach_surface`] then adds the surface the way shells hold one: as
/// a child of the shell controller, also reachable through its `webView`
/// property edge.
#[derive(Debug)]
pub struct ShellFixture {
    /// The mirrored hierarchy.
    pub tree: HostTree<SurfaceSlot>,
    /// The shell controller node surfaces get attached under.
    pub shell: NodeId,
}

impl Default for ShellFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellFixture {
    /// Build the surfaceless shell hierarchy.
    pub fn new() -> Self {
        let mut tree = HostTree::new();
        let window = tree.insert(None, Container::new("RootWindow"));
        let tabs = tree.insert(Some(window), Container::new("TabGroup"));
        let shell = tree.insert(Some(tabs), Container::new("AppBridgeViewController"));
        Self { tree, shell }
    }

    /// Attach a fresh surface under this fixture's shell controller.
    pub fn attach_surface(&mut self) -> NodeId {
        Self::attach_surface_to(&mut self.tree, self.shell)
    }

    /// Attach a fresh surface under `shell` in an arbitrary tree.
    pub fn attach_surface_to(tree: &mut HostTree<SurfaceSlot>, shell: NodeId) -> NodeId {
        let surface = tree.insert_surface(
            Some(shell),
            Container::new("WebSurface"),
            SurfaceSlot::new(),
        );
        tree.set_property(shell, "webView", surface);
        surface
    }
}
