// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_script --heading-base-level=0

//! Trellis Script: the boundary between native code and the hosted document.
//!
//! ## Overview
//!
//! Everything the bridge learns from, or tells, the hosted document travels
//! as an asynchronous script evaluation: a script string goes in, and some
//! time later the document answers with a value or an error on the same
//! thread. This crate models that boundary deterministically:
//!
//! - [`DocumentScripting`] is the trait a rendering surface implements to
//!   accept evaluations. Completion is a callback the surface invokes later;
//!   there is no executor and no cancellation of in-flight evaluations.
//! - [`EvalQueue`] is the FIFO a deterministic surface keeps its pending
//!   evaluations in until the embedder (or a test fixture) completes them.
//! - [`request_selected_text`] reads the document's live text selection, and
//!   [`SelectionEvent`] packages a completed gesture for relay.
//! - [`escape`] escapes text for interpolation into script string literals.
//!
//! ## Ordering
//!
//! Evaluations complete in the order the surface decides; this crate only
//! guarantees that each callback runs exactly once with its own result. A
//! callback may issue follow-up evaluations through the scripting handle it
//! is given.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod escape;
mod eval;
mod selection;

pub use eval::{
    DocumentScripting, EvalCallback, EvalQueue, EvalResult, PendingEval, ScriptError, ScriptValue,
};
pub use selection::{SELECTION_QUERY, SelectionEvent, request_selected_text};
