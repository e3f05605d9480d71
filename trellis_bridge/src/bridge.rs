// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The top-level bridge: drive discovery, install interception, route selections.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::hash::Hash;

use trellis_delegate::{DelegateInterceptor, SelectionHandler};
use trellis_host_tree::Locator;
use trellis_relay::{DEFAULT_HOOK, EventRelay};
use trellis_script::{DocumentScripting, SelectionEvent};

use crate::acquire::{AcquireConfig, AcquisitionLoop, AcquisitionState};
use crate::surface::SurfaceAccess;

/// Configuration for a [`SelectionBridge`].
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Surface discovery heuristics.
    pub locator: Locator,
    /// Acquisition timing.
    pub acquire: AcquireConfig,
    /// Global name for the relay's document-side hook.
    pub hook_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            locator: Locator::new(),
            acquire: AcquireConfig::default(),
            hook_name: String::from(DEFAULT_HOOK),
        }
    }
}

/// Wires completed selections from the interceptor into the relay.
struct RelayDelivery<K> {
    relay: Rc<RefCell<EventRelay<K>>>,
}

impl<K> SelectionHandler for RelayDelivery<K>
where
    K: Copy + Eq + Hash,
{
    fn on_selection(&mut self, surface: &mut dyn DocumentScripting, event: SelectionEvent) {
        self.relay.borrow_mut().deliver(surface, &event);
    }
}

/// Orchestrates the whole bridge for one rendering surface at a time.
///
/// Drives the [`Locator`] from the [`AcquisitionLoop`]; when the surface is
/// found, installs the [`DelegateInterceptor`] in its delegate slot (exactly
/// once — an already-intercepted slot is left alone, so the interceptor is
/// never chained to itself) and injects the relay's bridging script (once per
/// surface, tracked by the relay). After that the bridge is passive: gestures
/// flow through the installed delegate chain and arrive at the relay.
///
/// The bridge tracks exactly one surface handle. Handles are generational
/// keys into the host tree, so a destroyed surface leaves the handle stale
/// rather than dangling; the surrounding application restarts acquisition
/// with [`Self::begin`] when that happens.
pub struct SelectionBridge<K> {
    locator: Locator,
    acquisition: AcquisitionLoop,
    relay: Rc<RefCell<EventRelay<K>>>,
    handle: Option<K>,
}

impl<K> core::fmt::Debug for SelectionBridge<K>
where
    K: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SelectionBridge")
            .field("acquisition", &self.acquisition)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl<K> Default for SelectionBridge<K>
where
    K: Copy + Eq + Hash + 'static,
{
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

impl<K> SelectionBridge<K>
where
    K: Copy + Eq + Hash + 'static,
{
    /// Create a bridge from `config`. It is inert until [`Self::begin`].
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            locator: config.locator,
            acquisition: AcquisitionLoop::new(config.acquire),
            relay: Rc::new(RefCell::new(EventRelay::with_hook_name(config.hook_name))),
            handle: None,
        }
    }

    /// Start (or restart) acquisition at time `now_ms`.
    ///
    /// Restarting assumes any previously acquired surface is gone: the
    /// tracked handle is dropped and the relay's installation bookkeeping
    /// for it is cleared, so a recreated surface gets a fresh script
    /// injection.
    pub fn begin(&mut self, now_ms: u64) {
        if let Some(key) = self.handle.take() {
            self.relay.borrow_mut().forget(&key);
        }
        self.acquisition.begin(now_ms);
    }

    /// Current acquisition state.
    pub fn state(&self) -> AcquisitionState {
        self.acquisition.state()
    }

    /// Discovery attempts made since the last [`Self::begin`].
    pub fn attempts(&self) -> u32 {
        self.acquisition.attempts()
    }

    /// When the bridge next wants a [`Self::tick`], if at all.
    pub fn next_wake(&self) -> Option<u64> {
        self.acquisition.next_attempt_at()
    }

    /// The tracked surface handle, once installed.
    ///
    /// The key may have gone stale if the host destroyed the surface; check
    /// it against the tree before use.
    pub fn surface_handle(&self) -> Option<K> {
        self.handle
    }

    /// The relay, for registering notification listeners and routing the
    /// document's RPC calls.
    pub fn relay(&self) -> Rc<RefCell<EventRelay<K>>> {
        Rc::clone(&self.relay)
    }

    /// Advance the bridge at time `now_ms`.
    ///
    /// A no-op unless a discovery attempt is due. On a due tick the locator
    /// runs once; success installs the interception chain and parks the
    /// bridge in [`AcquisitionState::Installed`], failure schedules the next
    /// attempt. Ticking after installation never searches again.
    pub fn tick<T>(&mut self, now_ms: u64, tree: &mut T) -> AcquisitionState
    where
        T: SurfaceAccess<K>,
    {
        if !self.acquisition.try_begin_attempt(now_ms) {
            return self.acquisition.state();
        }
        let installed = self
            .locator
            .locate(tree)
            .is_some_and(|key| self.install(tree, key));
        self.acquisition.complete_attempt(now_ms, installed);
        if installed {
            tracing::debug!(attempts = self.acquisition.attempts(), "interception chain installed");
        } else {
            tracing::debug!(
                next_attempt_ms = ?self.acquisition.next_attempt_at(),
                "rendering surface not found; retrying"
            );
        }
        self.acquisition.state()
    }

    /// Install the interceptor and bridging script on the located surface.
    fn install<T>(&mut self, tree: &mut T, key: K) -> bool
    where
        T: SurfaceAccess<K>,
    {
        let Some(slot) = tree.slot_mut(&key) else {
            // The tree called it a surface but exposes no slot for it; treat
            // as not found and keep retrying.
            return false;
        };
        if !slot.has_interceptor() {
            let original = slot.take_delegate();
            let handler: Rc<RefCell<dyn SelectionHandler>> = Rc::new(RefCell::new(RelayDelivery {
                relay: Rc::clone(&self.relay),
            }));
            slot.set_delegate(Box::new(DelegateInterceptor::new(original, handler)));
        }
        self.relay.borrow_mut().install_script(key, slot);
        self.handle = Some(key);
        true
    }
}
