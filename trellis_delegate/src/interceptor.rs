// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selection-intercepting delegate decorator.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

use trellis_script::{DocumentScripting, SelectionEvent, request_selected_text};

use crate::{ContextMenuRequest, GesturePhase, LongPressGesture, MenuDecision, SelectionHandler, UiDelegate};

/// Decorator installed in a surface's delegate slot to take over selection.
///
/// Holds the delegate that was installed before it and forwards every call it
/// does not override, so host behavior for alerts, confirms, and prompts is
/// preserved exactly. The two overrides are the context-menu callback (always
/// [`MenuDecision::Suppress`]) and the long-press callback (selection
/// extraction plus cancellation of the native recognition).
pub struct DelegateInterceptor {
    original: Option<Box<dyn UiDelegate>>,
    handler: Rc<RefCell<dyn SelectionHandler>>,
}

impl core::fmt::Debug for DelegateInterceptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DelegateInterceptor")
            .field("has_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl DelegateInterceptor {
    /// Wrap `original` (the delegate previously installed on the surface, if
    /// any) and deliver completed selections to `handler`.
    pub fn new(
        original: Option<Box<dyn UiDelegate>>,
        handler: Rc<RefCell<dyn SelectionHandler>>,
    ) -> Self {
        Self { original, handler }
    }

    /// Whether a previous delegate is being forwarded to.
    pub fn has_original(&self) -> bool {
        self.original.is_some()
    }

    /// Tear down the decorator, yielding the preserved original delegate so
    /// an uninstaller can restore the slot to its prior state.
    pub fn into_original(self) -> Option<Box<dyn UiDelegate>> {
        self.original
    }
}

impl UiDelegate for DelegateInterceptor {
    fn context_menu(
        &mut self,
        _surface: &mut dyn DocumentScripting,
        _request: &ContextMenuRequest,
    ) -> MenuDecision {
        // The document renders its own menu; the default UI never appears.
        MenuDecision::Suppress
    }

    fn long_press(&mut self, surface: &mut dyn DocumentScripting, gesture: &mut LongPressGesture) {
        if gesture.phase() != GesturePhase::Began {
            return;
        }
        let anchor = gesture.location_in_surface();
        let captured_at = gesture.timestamp();
        let handler = Rc::clone(&self.handler);
        request_selected_text(surface, move |doc, text| {
            // Empty means no live selection (or a failed read): the gesture
            // completes silently and nothing reaches the handler.
            if let Some(event) = SelectionEvent::new(text, anchor, captured_at) {
                handler.borrow_mut().on_selection(doc, event);
            }
        });
        // Cancel the in-progress native recognition. The toggle leaves the
        // recognizer in its original enabled state.
        let was_enabled = gesture.is_enabled();
        gesture.set_enabled(false);
        gesture.set_enabled(was_enabled);
    }

    fn alert(&mut self, surface: &mut dyn DocumentScripting, message: &str) {
        if let Some(original) = self.original.as_deref_mut() {
            original.alert(surface, message);
        }
    }

    fn confirm(&mut self, surface: &mut dyn DocumentScripting, message: &str) -> bool {
        match self.original.as_deref_mut() {
            Some(original) => original.confirm(surface, message),
            None => false,
        }
    }

    fn prompt(
        &mut self,
        surface: &mut dyn DocumentScripting,
        message: &str,
        default: Option<&str>,
    ) -> Option<String> {
        match self.original.as_deref_mut() {
            Some(original) => original.prompt(surface, message, default),
            None => None,
        }
    }

    fn is_selection_interceptor(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use kurbo::{Affine, Point, Vec2};
    use trellis_script::{EvalCallback, EvalQueue, EvalResult, ScriptValue, SELECTION_QUERY};

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

    #[derive(Default)]
    struct RecordingDelegate {
        alerts: Vec<String>,
        confirms: Vec<String>,
        prompts: Vec<String>,
    }

    impl UiDelegate for RecordingDelegate {
        fn context_menu(
            &mut self,
            _surface: &mut dyn DocumentScripting,
            _request: &ContextMenuRequest,
        ) -> MenuDecision {
            MenuDecision::Allow
        }

        fn long_press(
            &mut self,
            _surface: &mut dyn DocumentScripting,
            _gesture: &mut LongPressGesture,
        ) {
        }

        fn alert(&mut self, _surface: &mut dyn DocumentScripting, message: &str) {
            self.alerts.push(message.to_string());
        }

        fn confirm(&mut self, _surface: &mut dyn DocumentScripting, message: &str) -> bool {
            self.confirms.push(message.to_string());
            message.starts_with("yes")
        }

        fn prompt(
            &mut self,
            _surface: &mut dyn DocumentScripting,
            message: &str,
            default: Option<&str>,
        ) -> Option<String> {
            self.prompts.push(message.to_string());
            default.map(|d| d.to_string())
        }
    }

    #[derive(Default)]
    struct Sink {
        events: Vec<SelectionEvent>,
    }

    impl SelectionHandler for Sink {
        fn on_selection(&mut self, _surface: &mut dyn DocumentScripting, event: SelectionEvent) {
            self.events.push(event);
        }
    }

    fn interceptor_with_sink(
        original: Option<Box<dyn UiDelegate>>,
    ) -> (DelegateInterceptor, Rc<RefCell<Sink>>) {
        let sink = Rc::new(RefCell::new(Sink::default()));
        let handler: Rc<RefCell<dyn SelectionHandler>> = sink.clone();
        (DelegateInterceptor::new(original, handler), sink)
    }

    #[test]
    fn context_menu_is_always_suppressed() {
        let (mut interceptor, _sink) =
            interceptor_with_sink(Some(Box::new(RecordingDelegate::default())));
        let mut doc = QueueDoc(EvalQueue::new());
        let request = ContextMenuRequest {
            location: Point::new(5.0, 5.0),
        };
        // The wrapped delegate would allow the menu; the interceptor denies it.
        assert_eq!(
            interceptor.context_menu(&mut doc, &request),
            MenuDecision::Suppress
        );
    }

    #[test]
    fn panel_calls_match_the_original_delegate_outcomes() {
        let mut doc = QueueDoc(EvalQueue::new());

        // Direct outcomes from a bare delegate.
        let mut direct = RecordingDelegate::default();
        let direct_confirm = direct.confirm(&mut doc, "yes please");
        let direct_prompt = direct.prompt(&mut doc, "name?", Some("anon"));

        // The same calls through the interceptor.
        let (mut interceptor, _sink) =
            interceptor_with_sink(Some(Box::new(RecordingDelegate::default())));
        interceptor.alert(&mut doc, "heads up");
        assert_eq!(
            interceptor.confirm(&mut doc, "yes please"),
            direct_confirm
        );
        assert_eq!(
            interceptor.prompt(&mut doc, "name?", Some("anon")),
            direct_prompt
        );
        assert_eq!(interceptor.confirm(&mut doc, "no thanks"), false);
    }

    #[test]
    fn panel_calls_without_original_complete_as_no_ops() {
        let (mut interceptor, _sink) = interceptor_with_sink(None);
        let mut doc = QueueDoc(EvalQueue::new());

        interceptor.alert(&mut doc, "ignored");
        assert!(!interceptor.confirm(&mut doc, "yes please"));
        assert_eq!(interceptor.prompt(&mut doc, "name?", Some("anon")), None);
        assert!(!interceptor.has_original());
    }

    #[test]
    fn began_long_press_queues_the_selection_query() {
        let (mut interceptor, _sink) = interceptor_with_sink(None);
        let mut doc = QueueDoc(EvalQueue::new());
        let mut gesture = LongPressGesture::new(GesturePhase::Began, Point::new(10.0, 20.0), 0);

        interceptor.long_press(&mut doc, &mut gesture);

        assert_eq!(doc.0.peek_script(), Some(SELECTION_QUERY));
        // The native recognition was cancelled once, and the recognizer is
        // back in its original enabled state.
        assert_eq!(gesture.cancellations(), 1);
        assert!(gesture.is_enabled());
    }

    #[test]
    fn non_began_phases_are_ignored() {
        let (mut interceptor, _sink) = interceptor_with_sink(None);
        let mut doc = QueueDoc(EvalQueue::new());
        for phase in [GesturePhase::Changed, GesturePhase::Ended, GesturePhase::Cancelled] {
            let mut gesture = LongPressGesture::new(phase, Point::new(10.0, 20.0), 0);
            interceptor.long_press(&mut doc, &mut gesture);
            assert!(doc.0.is_empty());
            assert_eq!(gesture.cancellations(), 0);
        }
    }

    #[test]
    fn selection_reaches_the_handler_with_surface_coordinates() {
        let (mut interceptor, sink) = interceptor_with_sink(None);
        let mut doc = QueueDoc(EvalQueue::new());
        let mut gesture = LongPressGesture::new(GesturePhase::Began, Point::new(110.0, 220.0), 77)
            .with_surface_transform(Affine::translate(Vec2::new(-10.0, -20.0)));

        interceptor.long_press(&mut doc, &mut gesture);
        answer(&mut doc, Ok(ScriptValue::Text("Hello world".to_string())));

        let sink = sink.borrow();
        assert_eq!(sink.events.len(), 1);
        let event = &sink.events[0];
        assert_eq!(event.selected_text(), "Hello world");
        assert_eq!(event.anchor(), Point::new(100.0, 200.0));
        assert_eq!(event.captured_at(), 77);
    }

    #[test]
    fn empty_selection_never_reaches_the_handler() {
        let (mut interceptor, sink) = interceptor_with_sink(None);
        let mut doc = QueueDoc(EvalQueue::new());
        let mut gesture = LongPressGesture::new(GesturePhase::Began, Point::new(1.0, 1.0), 0);

        interceptor.long_press(&mut doc, &mut gesture);
        answer(&mut doc, Ok(ScriptValue::Text(String::new())));

        assert!(sink.borrow().events.is_empty());
        assert!(gesture.is_enabled());
    }

    #[test]
    fn interceptor_is_tagged_and_yields_its_original() {
        let (interceptor, _sink) =
            interceptor_with_sink(Some(Box::new(RecordingDelegate::default())));
        assert!(interceptor.is_selection_interceptor());
        assert!(!RecordingDelegate::default().is_selection_interceptor());

        let restored = interceptor.into_original();
        assert!(restored.is_some_and(|d| !d.is_selection_interceptor()));
    }

    #[test]
    fn disabled_recognizer_stays_disabled_after_handling() {
        let (mut interceptor, _sink) = interceptor_with_sink(None);
        let mut doc = QueueDoc(EvalQueue::new());
        let mut gesture = LongPressGesture::new(GesturePhase::Began, Point::new(0.0, 0.0), 0);
        gesture.set_enabled(false);
        let before = gesture.cancellations();

        interceptor.long_press(&mut doc, &mut gesture);

        assert!(!gesture.is_enabled());
        // Already-disabled recognizers have nothing in progress to cancel.
        assert_eq!(gesture.cancellations(), before);
    }
}
