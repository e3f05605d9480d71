// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading the document's live text selection.

use alloc::boxed::Box;
use alloc::string::String;

use kurbo::Point;

use crate::eval::{DocumentScripting, ScriptValue};

/// The evaluation that reads the document's current selection as plain text.
pub const SELECTION_QUERY: &str = "document.getSelection().toString()";

/// Structured record of a completed text-selection gesture.
///
/// Carries the selected text, the gesture's anchor point in the surface's
/// coordinate space, and the capture timestamp in embedder milliseconds.
/// An event can only be constructed with non-empty text; the absence of a
/// selection yields no event rather than an empty one, which is what keeps
/// "no selection" invisible downstream.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionEvent {
    selected_text: String,
    anchor: Point,
    captured_at: u64,
}

impl SelectionEvent {
    /// Create an event, or `None` when `selected_text` is empty.
    pub fn new(selected_text: impl Into<String>, anchor: Point, captured_at: u64) -> Option<Self> {
        let selected_text = selected_text.into();
        if selected_text.is_empty() {
            return None;
        }
        Some(Self {
            selected_text,
            anchor,
            captured_at,
        })
    }

    /// The selected text. Never empty.
    pub fn selected_text(&self) -> &str {
        &self.selected_text
    }

    /// Anchor point of the gesture, in the surface's coordinate space.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Capture timestamp, in embedder milliseconds.
    pub fn captured_at(&self) -> u64 {
        self.captured_at
    }
}

/// Ask the hosted document for its live selection.
///
/// Issues a single asynchronous evaluation of [`SELECTION_QUERY`]. `on_text`
/// runs when the document answers, receiving the selection text — or the
/// empty string when the document has no selection, answered with a
/// non-string value, or failed the evaluation. Failures are logged and never
/// surfaced to the caller; a gesture whose extraction fails simply completes
/// without producing anything.
pub fn request_selected_text(
    doc: &mut dyn DocumentScripting,
    on_text: impl FnOnce(&mut dyn DocumentScripting, String) + 'static,
) {
    doc.evaluate(
        String::from(SELECTION_QUERY),
        Box::new(move |doc, result| {
            let text = match result {
                Ok(ScriptValue::Text(text)) => text,
                Ok(other) => {
                    tracing::debug!(?other, "selection query answered with a non-string value");
                    String::new()
                }
                Err(err) => {
                    tracing::warn!(error = err.message(), "selection query failed");
                    String::new()
                }
            };
            on_text(doc, text);
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{EvalCallback, EvalQueue, EvalResult, ScriptError};
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use core::cell::RefCell;

    struct QueueDoc(EvalQueue);

    impl DocumentScripting for QueueDoc {
        fn evaluate(&mut self, script: String, on_result: EvalCallback) {
            self.0.push(script, on_result);
        }
    }

    fn answer(doc: &mut QueueDoc, result: EvalResult) {
        let pending = doc.0.pop().expect("an evaluation should be pending");
        (pending.on_result)(doc, result);
    }

    fn request(doc: &mut QueueDoc) -> Rc<RefCell<Option<String>>> {
        let out: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&out);
        request_selected_text(doc, move |_, text| {
            *sink.borrow_mut() = Some(text);
        });
        out
    }

    #[test]
    fn issues_the_selection_query() {
        let mut doc = QueueDoc(EvalQueue::new());
        let _ = request(&mut doc);
        assert_eq!(doc.0.peek_script(), Some(SELECTION_QUERY));
    }

    #[test]
    fn resolves_to_the_selected_text() {
        let mut doc = QueueDoc(EvalQueue::new());
        let out = request(&mut doc);
        answer(&mut doc, Ok(ScriptValue::Text("Hello world".to_string())));
        assert_eq!(out.borrow().as_deref(), Some("Hello world"));
    }

    #[test]
    fn resolves_to_empty_on_evaluation_error() {
        let mut doc = QueueDoc(EvalQueue::new());
        let out = request(&mut doc);
        answer(&mut doc, Err(ScriptError::new("frame went away")));
        assert_eq!(out.borrow().as_deref(), Some(""));
    }

    #[test]
    fn resolves_to_empty_on_non_string_answer() {
        let mut doc = QueueDoc(EvalQueue::new());
        let out = request(&mut doc);
        answer(&mut doc, Ok(ScriptValue::Null));
        assert_eq!(out.borrow().as_deref(), Some(""));
    }

    #[test]
    fn selection_event_refuses_empty_text() {
        assert!(SelectionEvent::new("", Point::new(1.0, 2.0), 0).is_none());
        let ev = SelectionEvent::new("words", Point::new(1.0, 2.0), 42).unwrap();
        assert_eq!(ev.selected_text(), "words");
        assert_eq!(ev.anchor(), Point::new(1.0, 2.0));
        assert_eq!(ev.captured_at(), 42);
    }
}
