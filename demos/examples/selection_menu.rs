// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end walk through the selection bridge against scripted fixtures.
//!
//! Builds a shell hierarchy that starts out without a rendering surface, lets
//! the acquisition loop retry until the surface appears, then fires a long
//! press over a selection and prints the scripts delivered to the hosted
//! document.
//!
//! Run with `cargo run -p trellis_demos --example selection_menu`.

use kurbo::Point;
use trellis_bridge::{AcquisitionState, BridgeConfig, SelectionBridge, SurfaceAccess};
use trellis_delegate::{GesturePhase, LongPressGesture};
use trellis_harness::{DocumentFixture, ShellFixture};
use trellis_host_tree::NodeId;
use trellis_relay::TEXT_SELECTED;

fn main() {
    let mut fixture = ShellFixture::new();
    let mut doc = DocumentFixture::new();

    let mut bridge: SelectionBridge<NodeId> = SelectionBridge::new(BridgeConfig::default());
    bridge
        .relay()
        .borrow_mut()
        .add_listener(TEXT_SELECTED, Box::new(|n| println!("native listener: {n:?}")));

    // Drive the acquisition loop on a simulated clock. The surface only
    // appears while the third retry is pending, the way a slow host would
    // behave.
    bridge.begin(0);
    let mut surface = None;
    let mut now = 0;
    while bridge.state() != AcquisitionState::Installed {
        now = bridge.next_wake().expect("an attempt is always scheduled");
        let state = bridge.tick(now, &mut fixture.tree);
        println!("t={now}ms attempt {} -> {state:?}", bridge.attempts());
        if bridge.attempts() == 3 && surface.is_none() {
            surface = Some(fixture.attach_surface());
            println!("t={now}ms host finished initializing; surface attached");
        }
    }
    let surface = surface.expect("installed implies a surface");

    // Answer the bridging-script injection.
    doc.pump(fixture.tree.slot_mut(&surface).expect("surface is live"));

    // A long press over selected text.
    doc.set_selection("Hello world");
    let mut gesture = LongPressGesture::new(GesturePhase::Began, Point::new(100.0, 200.0), now);
    let slot = fixture.tree.slot_mut(&surface).expect("surface is live");
    slot.dispatch_long_press(&mut gesture);
    doc.pump(slot);

    println!("\nscripts evaluated against the document:");
    for (i, script) in doc.evaluated().iter().enumerate() {
        println!("--- #{i} ---\n{script}");
    }
}
