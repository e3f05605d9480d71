// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface state: the delegate chain slot and the evaluation queue.

use alloc::boxed::Box;
use alloc::string::String;

use kurbo::Affine;

use trellis_delegate::{ContextMenuRequest, LongPressGesture, MenuDecision, UiDelegate};
use trellis_host_tree::{HostTree, NodeId};
use trellis_script::{DocumentScripting, EvalCallback, EvalQueue, EvalResult};

/// Library-owned state for one embedded rendering surface.
///
/// A slot carries the surface's UI-delegate chain (at most one delegate at a
/// time; wrapping preserves the previous one inside the wrapper), the FIFO of
/// script evaluations awaiting the platform's answer, and the transform from
/// window coordinates into the surface's coordinate space.
///
/// The embedder is the platform glue: it forwards real delegate callbacks
/// through the `dispatch_*` helpers and, when the platform finishes a script
/// evaluation, hands the answer to [`SurfaceSlot::complete_next`]. Both
/// directions run on the single UI thread.
pub struct SurfaceSlot {
    delegate: Option<Box<dyn UiDelegate>>,
    evals: EvalQueue,
    from_window: Affine,
}

impl core::fmt::Debug for SurfaceSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SurfaceSlot")
            .field("has_delegate", &self.delegate.is_some())
            .field("has_interceptor", &self.has_interceptor())
            .field("pending_evaluations", &self.evals.len())
            .field("from_window", &self.from_window)
            .finish_non_exhaustive()
    }
}

impl Default for SurfaceSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceSlot {
    /// Create a slot with no delegate and an identity window transform.
    pub fn new() -> Self {
        Self {
            delegate: None,
            evals: EvalQueue::new(),
            from_window: Affine::IDENTITY,
        }
    }

    /// Set the transform from window coordinates into surface coordinates.
    pub fn set_window_transform(&mut self, from_window: Affine) {
        self.from_window = from_window;
    }

    /// The transform from window coordinates into surface coordinates.
    pub fn window_transform(&self) -> Affine {
        self.from_window
    }

    // --- delegate chain ---

    /// The installed delegate, if any.
    pub fn delegate(&self) -> Option<&dyn UiDelegate> {
        self.delegate.as_deref()
    }

    /// Take the installed delegate out of the slot.
    pub fn take_delegate(&mut self) -> Option<Box<dyn UiDelegate>> {
        self.delegate.take()
    }

    /// Install `delegate`, replacing whatever was in the slot.
    pub fn set_delegate(&mut self, delegate: Box<dyn UiDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Whether the installed delegate is a selection interceptor.
    pub fn has_interceptor(&self) -> bool {
        self.delegate
            .as_ref()
            .is_some_and(|d| d.is_selection_interceptor())
    }

    // --- delegate dispatch ---
    //
    // The slot is handed to the delegate as its scripting surface, so the
    // delegate is taken out for the duration of the call and restored after.
    // The slot's delegate must not be replaced from inside a dispatch.

    /// Route the "should the default context menu appear" callback.
    ///
    /// Without a delegate the platform default applies (the menu is allowed).
    pub fn dispatch_context_menu(&mut self, request: &ContextMenuRequest) -> MenuDecision {
        match self.delegate.take() {
            Some(mut delegate) => {
                let decision = delegate.context_menu(self, request);
                self.delegate = Some(delegate);
                decision
            }
            None => MenuDecision::Allow,
        }
    }

    /// Route a long-press gesture report.
    ///
    /// The slot's window→surface transform is stamped onto the gesture before
    /// the delegate sees it, so delegates always localize against the
    /// surface's current placement.
    pub fn dispatch_long_press(&mut self, gesture: &mut LongPressGesture) {
        gesture.set_surface_transform(self.from_window);
        if let Some(mut delegate) = self.delegate.take() {
            delegate.long_press(self, gesture);
            self.delegate = Some(delegate);
        }
    }

    /// Route a script-raised alert panel.
    pub fn dispatch_alert(&mut self, message: &str) {
        if let Some(mut delegate) = self.delegate.take() {
            delegate.alert(self, message);
            self.delegate = Some(delegate);
        }
    }

    /// Route a script-raised confirm panel. Defaults to `false` without a
    /// delegate.
    pub fn dispatch_confirm(&mut self, message: &str) -> bool {
        match self.delegate.take() {
            Some(mut delegate) => {
                let answer = delegate.confirm(self, message);
                self.delegate = Some(delegate);
                answer
            }
            None => false,
        }
    }

    /// Route a script-raised input prompt. Defaults to `None` without a
    /// delegate.
    pub fn dispatch_prompt(&mut self, message: &str, default: Option<&str>) -> Option<String> {
        match self.delegate.take() {
            Some(mut delegate) => {
                let answer = delegate.prompt(self, message, default);
                self.delegate = Some(delegate);
                answer
            }
            None => None,
        }
    }

    // --- evaluation plumbing ---

    /// Number of script evaluations awaiting an answer.
    pub fn pending_evaluations(&self) -> usize {
        self.evals.len()
    }

    /// The script of the oldest pending evaluation, if any.
    pub fn peek_script(&self) -> Option<&str> {
        self.evals.peek_script()
    }

    /// Answer the oldest pending evaluation.
    ///
    /// Runs its completion callback with `result` and this slot as the
    /// scripting handle, so callbacks can issue follow-up evaluations.
    /// Returns `false` when nothing was pending.
    pub fn complete_next(&mut self, result: EvalResult) -> bool {
        let Some(pending) = self.evals.pop() else {
            return false;
        };
        (pending.on_result)(self, result);
        true
    }
}

impl DocumentScripting for SurfaceSlot {
    fn evaluate(&mut self, script: String, on_result: EvalCallback) {
        self.evals.push(script, on_result);
    }
}

/// A container hierarchy whose surface nodes expose a [`SurfaceSlot`].
///
/// The bridge is written against this trait; [`HostTree`] with `SurfaceSlot`
/// payloads is the canonical implementation.
pub trait SurfaceAccess<K>: trellis_host_tree::ContainerTree<K> {
    /// Exclusive access to the slot of a live surface node.
    fn slot_mut(&mut self, key: &K) -> Option<&mut SurfaceSlot>;
}

impl SurfaceAccess<NodeId> for HostTree<SurfaceSlot> {
    fn slot_mut(&mut self, key: &NodeId) -> Option<&mut SurfaceSlot> {
        self.surface_mut(*key)
    }
}
