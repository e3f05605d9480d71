// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asynchronous script evaluation: values, errors, and the pending queue.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::String;

/// Value produced by evaluating a script in the hosted document.
///
/// This mirrors the small set of primitives a document evaluation can hand
/// back across the boundary. Structured results are out of scope; callers
/// that need them encode into a string on the document side.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptValue {
    /// The script produced no value (`undefined`/`null`).
    Null,
    /// A boolean result.
    Bool(bool),
    /// A numeric result.
    Number(f64),
    /// A string result.
    Text(String),
}

/// Error reported by the hosted document for a failed evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptError {
    message: String,
}

impl ScriptError {
    /// Create an error carrying the document's diagnostic message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The document's diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "script evaluation failed: {}", self.message)
    }
}

impl core::error::Error for ScriptError {}

/// Outcome of a script evaluation.
pub type EvalResult = Result<ScriptValue, ScriptError>;

/// Completion callback for an evaluation.
///
/// The callback receives a scripting handle so it can issue follow-up
/// evaluations (for example, delivering a result back into the document).
pub type EvalCallback = Box<dyn FnOnce(&mut dyn DocumentScripting, EvalResult)>;

/// The hosted document's script-evaluation capability.
///
/// `evaluate` must not run `on_result` synchronously; the surface records the
/// request and completes it later on the same thread, preserving the
/// suspension-point semantics of a real embedded document. Evaluations are
/// never cancelled: once issued, `on_result` runs exactly once.
pub trait DocumentScripting {
    /// Issue an asynchronous evaluation of `script` against the document.
    fn evaluate(&mut self, script: String, on_result: EvalCallback);
}

/// A script evaluation awaiting completion.
pub struct PendingEval {
    /// The script to evaluate.
    pub script: String,
    /// Callback to invoke with the document's answer.
    pub on_result: EvalCallback,
}

impl core::fmt::Debug for PendingEval {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PendingEval")
            .field("script", &self.script)
            .finish_non_exhaustive()
    }
}

/// FIFO of script evaluations awaiting completion by the embedder.
///
/// Surfaces built on this queue record evaluations in issue order and let the
/// platform glue (or a test fixture) answer them one at a time.
#[derive(Debug, Default)]
pub struct EvalQueue {
    pending: VecDeque<PendingEval>,
}

impl EvalQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Record an evaluation.
    pub fn push(&mut self, script: String, on_result: EvalCallback) {
        self.pending.push_back(PendingEval { script, on_result });
    }

    /// Number of evaluations waiting for an answer.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no evaluations are waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The script of the oldest pending evaluation, if any.
    pub fn peek_script(&self) -> Option<&str> {
        self.pending.front().map(|p| p.script.as_str())
    }

    /// Take the oldest pending evaluation.
    ///
    /// The caller is responsible for invoking the returned callback with the
    /// document's answer and a scripting handle for follow-ups.
    pub fn pop(&mut self) -> Option<PendingEval> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use core::cell::RefCell;

    struct QueueDoc(EvalQueue);

    impl DocumentScripting for QueueDoc {
        fn evaluate(&mut self, script: String, on_result: EvalCallback) {
            self.0.push(script, on_result);
        }
    }

    #[test]
    fn queue_preserves_issue_order() {
        let mut doc = QueueDoc(EvalQueue::new());
        doc.evaluate("first".to_string(), Box::new(|_, _| {}));
        doc.evaluate("second".to_string(), Box::new(|_, _| {}));

        assert_eq!(doc.0.len(), 2);
        assert_eq!(doc.0.peek_script(), Some("first"));
        assert_eq!(doc.0.pop().unwrap().script, "first");
        assert_eq!(doc.0.pop().unwrap().script, "second");
        assert!(doc.0.is_empty());
    }

    #[test]
    fn callback_runs_with_the_result_and_can_follow_up() {
        let mut doc = QueueDoc(EvalQueue::new());
        let seen: Rc<RefCell<Option<EvalResult>>> = Rc::new(RefCell::new(None));
        let seen2 = Rc::clone(&seen);

        doc.evaluate(
            "q".to_string(),
            Box::new(move |doc, result| {
                *seen2.borrow_mut() = Some(result);
                // Follow-up evaluations enqueue through the handle.
                doc.evaluate("followup".to_string(), Box::new(|_, _| {}));
            }),
        );

        let pending = doc.0.pop().unwrap();
        (pending.on_result)(&mut doc, Ok(ScriptValue::Bool(true)));

        assert_eq!(*seen.borrow(), Some(Ok(ScriptValue::Bool(true))));
        assert_eq!(doc.0.peek_script(), Some("followup"));
    }

    #[test]
    fn script_error_displays_its_message() {
        let err = ScriptError::new("ReferenceError: x is not defined");
        assert_eq!(
            err.to_string(),
            "script evaluation failed: ReferenceError: x is not defined"
        );
    }
}
