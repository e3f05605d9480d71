// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_delegate --heading-base-level=0

//! Trellis Delegate: the rendering surface's UI-event interface, and a
//! decorator that takes over text selection.
//!
//! ## Overview
//!
//! A rendering surface reports user-interaction events — context menus,
//! long-press gestures, script-raised panels — to native code through a
//! delegate. [`UiDelegate`] models that interface as a full trait: every
//! method is part of the contract, so a decorator must visibly handle or
//! forward each one and a silently dropped call cannot happen by accident.
//!
//! [`DelegateInterceptor`] is that decorator. Installed in a surface's
//! delegate slot, it:
//!
//! - suppresses the default context menu unconditionally,
//! - turns began-phase long presses into an asynchronous selection read,
//!   handing any non-empty result to the installed [`SelectionHandler`]
//!   together with the gesture's anchor point in surface coordinates,
//! - cancels the in-progress native recognition by toggling the gesture
//!   recognizer's enabled flag off and back, leaving the recognizer in its
//!   original enabled state,
//! - forwards every panel callback verbatim to the delegate that was
//!   installed before it. With no previous delegate, panel calls complete as
//!   no-ops (alerts return, confirms answer `false`, prompts answer `None`).
//!
//! Interceptors tag themselves via [`UiDelegate::is_selection_interceptor`],
//! which is how installers detect an already-wrapped slot and avoid chaining
//! an interceptor to itself.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod interceptor;

pub use interceptor::DelegateInterceptor;

use alloc::string::String;

use kurbo::{Affine, Point};
use trellis_script::{DocumentScripting, SelectionEvent};

/// Outcome of the "should the default context menu appear" callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuDecision {
    /// Let the platform show its default menu.
    Allow,
    /// Suppress the default menu entirely.
    Suppress,
}

/// Details of a pending context menu, as reported by the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenuRequest {
    /// Where the menu would appear, in the surface's coordinate space.
    pub location: Point,
}

/// Recognition phase of a long-press gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    /// The press has been held long enough to begin recognition.
    Began,
    /// The touch moved while recognized.
    Changed,
    /// The touch lifted.
    Ended,
    /// Recognition was cancelled by the system.
    Cancelled,
}

/// A long-press gesture as reported by the surface's recognizer.
///
/// Positions arrive in window coordinates together with a localizing
/// transform into the surface's coordinate space; [`Self::location_in_surface`]
/// applies it. Toggling [`Self::set_enabled`] to `false` cancels any
/// in-progress recognition, which is the only cancellation mechanism the
/// platform offers for suppressing default gesture behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct LongPressGesture {
    phase: GesturePhase,
    position: Point,
    to_surface: Affine,
    timestamp: u64,
    enabled: bool,
    cancellations: u32,
}

impl LongPressGesture {
    /// Create a gesture report at `position` (window coordinates).
    ///
    /// `timestamp` is in embedder milliseconds. The window→surface transform
    /// defaults to identity; see [`Self::with_surface_transform`].
    pub fn new(phase: GesturePhase, position: Point, timestamp: u64) -> Self {
        Self {
            phase,
            position,
            to_surface: Affine::IDENTITY,
            timestamp,
            enabled: true,
            cancellations: 0,
        }
    }

    /// Attach the transform from window coordinates into the surface's
    /// coordinate space.
    pub fn with_surface_transform(mut self, to_surface: Affine) -> Self {
        self.to_surface = to_surface;
        self
    }

    /// Replace the window→surface transform in place.
    ///
    /// Dispatchers that know the surface's placement stamp it here before
    /// handing the gesture to a delegate.
    pub fn set_surface_transform(&mut self, to_surface: Affine) {
        self.to_surface = to_surface;
    }

    /// Current recognition phase.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Position in window coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Position converted into the surface's coordinate space.
    pub fn location_in_surface(&self) -> Point {
        self.to_surface * self.position
    }

    /// Timestamp of the gesture report, in embedder milliseconds.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Whether the recognizer is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the recognizer.
    ///
    /// Disabling an enabled recognizer cancels its in-progress recognition;
    /// re-enabling arms it again for future gestures.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled && !enabled {
            self.cancellations += 1;
        }
        self.enabled = enabled;
    }

    /// How many times in-progress recognition has been cancelled.
    pub fn cancellations(&self) -> u32 {
        self.cancellations
    }
}

/// The callback interface through which a rendering surface reports
/// user-interaction events to native code.
///
/// Every method is part of the contract. Decorators wrapping another delegate
/// must either handle each call or forward it; there is no optional subset.
pub trait UiDelegate {
    /// The surface is about to show its default context menu for a pending
    /// text selection.
    fn context_menu(
        &mut self,
        surface: &mut dyn DocumentScripting,
        request: &ContextMenuRequest,
    ) -> MenuDecision;

    /// The surface's long-press recognizer reported a gesture.
    fn long_press(&mut self, surface: &mut dyn DocumentScripting, gesture: &mut LongPressGesture);

    /// Script in the document raised an alert panel.
    fn alert(&mut self, surface: &mut dyn DocumentScripting, message: &str);

    /// Script in the document raised a confirm panel.
    fn confirm(&mut self, surface: &mut dyn DocumentScripting, message: &str) -> bool;

    /// Script in the document raised a text-input prompt.
    fn prompt(
        &mut self,
        surface: &mut dyn DocumentScripting,
        message: &str,
        default: Option<&str>,
    ) -> Option<String>;

    /// Tag for detecting an installed [`DelegateInterceptor`].
    ///
    /// Installers check this before wrapping a slot so repeated installation
    /// never chains an interceptor to itself.
    fn is_selection_interceptor(&self) -> bool {
        false
    }
}

/// Receiver for completed text selections.
///
/// The interceptor hands over the selection text and anchor once extraction
/// finishes with a non-empty result; gestures without a selection never reach
/// the handler.
pub trait SelectionHandler {
    /// A long-press gesture completed with a live selection.
    fn on_selection(&mut self, surface: &mut dyn DocumentScripting, event: SelectionEvent);
}
