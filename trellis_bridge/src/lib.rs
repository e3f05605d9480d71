// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_bridge --heading-base-level=0

//! Trellis Bridge: acquire the rendering surface and take over text selection.
//!
//! ## Overview
//!
//! This crate ties the other Trellis pieces into the full bridge:
//!
//! - [`SurfaceSlot`] is the library-owned state for one embedded rendering
//!   surface: its delegate chain slot, its pending script evaluations, and
//!   its window→surface transform. The embedder routes platform callbacks
//!   through the slot's `dispatch_*` helpers and answers evaluations via
//!   [`SurfaceSlot::complete_next`].
//! - [`AcquisitionLoop`] is the retrying state machine that paces discovery:
//!   a first attempt once the host has had time to initialize, then
//!   fixed-delay retries without bound until the surface appears.
//! - [`SelectionBridge`] drives the locator from the acquisition loop and,
//!   on success, installs the selection interceptor in the surface's
//!   delegate slot and injects the relay's bridging script — each exactly
//!   once per surface, no matter how many searching/retrying cycles came
//!   before or how often acquisition is re-driven afterwards.
//!
//! ## Driving the bridge
//!
//! Everything runs on the embedder's UI thread and clock. Call
//! [`SelectionBridge::begin`] when the app starts (or whenever the surface
//! was lost), then [`SelectionBridge::tick`] with the current time; the next
//! deadline is available from [`SelectionBridge::next_wake`]. Once installed,
//! long presses flow through the surface's delegate chain: extraction runs
//! against the document, and non-empty selections are delivered back into it
//! through the relay.
//!
//! Surface loss is tolerated, not detected: identifiers go stale through the
//! host tree's generational liveness, stale operations no-op, and the
//! surrounding application decides when to call `begin` again.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod acquire;
mod bridge;
mod surface;

pub use acquire::{AcquireConfig, AcquisitionLoop, AcquisitionState};
pub use bridge::{BridgeConfig, SelectionBridge};
pub use surface::{SurfaceAccess, SurfaceSlot};
