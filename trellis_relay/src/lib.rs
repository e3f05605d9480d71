// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_relay --heading-base-level=0

//! Trellis Relay: selection events across the native/document boundary, both ways.
//!
//! ## Native → document
//!
//! At acquisition time the relay injects a bridging script into the surface,
//! once per surface: it defines a global hook function which dispatches the
//! [`SELECTION_EVENT`] document event carrying `{selectedText, x, y}` and
//! returns `true`. Delivering a [`SelectionEvent`] evaluates a script that
//! invokes the hook when present and falls back to dispatching the document
//! event directly — both paths carry an identical payload, so document code
//! may either listen for the event or replace the hook. Each completed
//! gesture produces at most one delivery. Delivery also emits the
//! [`TEXT_SELECTED`] notification to natively registered listeners.
//!
//! The relay owns its per-surface installation state: which surfaces carry
//! the bridging script is tracked on the relay instance, and the
//! install/uninstall lifecycle follows surface acquisition. Nothing global is
//! shared between relay instances, so bridging several surfaces from several
//! relays cannot leak hooks across them.
//!
//! ## Document → native
//!
//! Two operations are callable from document script code, with request/response
//! semantics:
//!
//! - [`EventRelay::show_custom_text_selection_menu`] — requires `x`, `y`, and
//!   `selectedText`; emits [`MENU_SHOWN`] on success.
//! - [`EventRelay::handle_text_selection_action`] — requires `action` and
//!   `selectedText`; emits [`SELECTION_ACTION`] on success.
//!
//! A call missing a required parameter is rejected with
//! [`RelayError::MissingParameter`] naming the operation and the first
//! missing field, and emits nothing. Validation rejections are the only
//! failures the relay ever surfaces to callers.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod rpc;

pub use rpc::{RelayError, RpcCall, RpcValue};

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

use trellis_script::escape::escape_text;
use trellis_script::{DocumentScripting, SelectionEvent};

/// Name of the document event dispatched for every delivered selection.
pub const SELECTION_EVENT: &str = "custom-text-selection";

/// Default name of the global hook function the bridging script installs.
pub const DEFAULT_HOOK: &str = "trellisShowSelectionMenu";

/// Notification emitted when a selection is delivered to the document.
pub const TEXT_SELECTED: &str = "textSelected";

/// Notification emitted after a successful menu-show call.
pub const MENU_SHOWN: &str = "textSelectionMenuShown";

/// Notification emitted after a successful action call.
pub const SELECTION_ACTION: &str = "textSelectionAction";

/// A one-way notification fanned out to registered listeners.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// Text was selected and delivered to the document ([`TEXT_SELECTED`]).
    TextSelected {
        /// Anchor x, in surface coordinates.
        x: f64,
        /// Anchor y, in surface coordinates.
        y: f64,
        /// The selected text.
        selected_text: String,
    },
    /// The document confirmed showing its menu ([`MENU_SHOWN`]).
    MenuShown {
        /// Whether the menu was shown.
        success: bool,
        /// Menu x, in surface coordinates.
        x: f64,
        /// Menu y, in surface coordinates.
        y: f64,
        /// The selected text the menu was shown for.
        selected_text: String,
    },
    /// The document reported a follow-up action ([`SELECTION_ACTION`]).
    Action {
        /// The action identifier chosen in the menu.
        action: String,
        /// The selected text the action applies to.
        selected_text: String,
    },
}

impl Notification {
    /// The notification name listeners register under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TextSelected { .. } => TEXT_SELECTED,
            Self::MenuShown { .. } => MENU_SHOWN,
            Self::Action { .. } => SELECTION_ACTION,
        }
    }
}

/// Callback registered for a notification name.
pub type Listener = Box<dyn FnMut(&Notification)>;

/// The two-way relay between native selection handling and document script.
///
/// `K` identifies surfaces for installation bookkeeping; any small copyable
/// key works (a host-tree node id in practice).
///
/// ## Example
///
/// ```rust
/// use trellis_relay::{EventRelay, Notification, RpcCall};
///
/// let mut relay: EventRelay<u32> = EventRelay::new();
/// relay.add_listener(
///     trellis_relay::SELECTION_ACTION,
///     Box::new(|n| assert!(matches!(n, Notification::Action { .. }))),
/// );
///
/// let call = RpcCall::new()
///     .with_text("action", "translate")
///     .with_text("selectedText", "bonjour");
/// relay.handle_text_selection_action(&call).unwrap();
/// ```
pub struct EventRelay<K> {
    hook: String,
    installed: HashSet<K>,
    listeners: HashMap<String, Vec<Listener>>,
}

impl<K> core::fmt::Debug for EventRelay<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventRelay")
            .field("hook", &self.hook)
            .field("installed", &self.installed.len())
            .field("listener_names", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<K> Default for EventRelay<K>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EventRelay<K>
where
    K: Copy + Eq + Hash,
{
    /// Create a relay using [`DEFAULT_HOOK`] as the hook name.
    pub fn new() -> Self {
        Self::with_hook_name(DEFAULT_HOOK)
    }

    /// Create a relay installing its hook under a custom global name.
    pub fn with_hook_name(hook: impl Into<String>) -> Self {
        Self {
            hook: hook.into(),
            installed: HashSet::new(),
            listeners: HashMap::new(),
        }
    }

    /// The global name the bridging hook is installed under.
    pub fn hook_name(&self) -> &str {
        &self.hook
    }

    /// Whether the bridging script has been injected into `key`.
    pub fn is_installed(&self, key: &K) -> bool {
        self.installed.contains(key)
    }

    /// Inject the bridging script into the surface identified by `key`.
    ///
    /// Idempotent per surface: the first call evaluates the script and
    /// returns `true`; repeats are no-ops returning `false`.
    pub fn install_script(&mut self, key: K, doc: &mut dyn DocumentScripting) -> bool {
        if !self.installed.insert(key) {
            return false;
        }
        doc.evaluate(install_script(&self.hook), logging_completion("hook install"));
        true
    }

    /// Remove the bridging hook from the surface identified by `key`.
    ///
    /// Returns `false` when the script was never installed there.
    pub fn uninstall_script(&mut self, key: K, doc: &mut dyn DocumentScripting) -> bool {
        if !self.installed.remove(&key) {
            return false;
        }
        doc.evaluate(uninstall_script(&self.hook), logging_completion("hook uninstall"));
        true
    }

    /// Drop installation bookkeeping for a surface that no longer exists.
    ///
    /// Used when the surface was destroyed out from under the bridge and
    /// there is no document left to script against.
    pub fn forget(&mut self, key: &K) {
        self.installed.remove(key);
    }

    /// Register a listener for a notification name.
    pub fn add_listener(&mut self, name: impl Into<String>, listener: Listener) {
        self.listeners.entry(name.into()).or_default().push(listener);
    }

    /// Deliver a completed selection into the hosted document.
    ///
    /// Evaluates the delivery script (hook when present, document-event
    /// fallback otherwise) and emits [`TEXT_SELECTED`]. Script failures are
    /// logged and otherwise invisible.
    pub fn deliver(&mut self, doc: &mut dyn DocumentScripting, event: &SelectionEvent) {
        doc.evaluate(
            delivery_script(&self.hook, event),
            logging_completion("selection delivery"),
        );
        let anchor = event.anchor();
        self.notify(Notification::TextSelected {
            x: anchor.x,
            y: anchor.y,
            selected_text: String::from(event.selected_text()),
        });
    }

    /// Document→native: the document asks to show its selection menu.
    ///
    /// Requires `x`, `y`, and `selectedText`; rejects naming the first
    /// missing one. On success emits [`MENU_SHOWN`] with `success: true`.
    pub fn show_custom_text_selection_menu(&mut self, call: &RpcCall) -> Result<(), RelayError> {
        const CALL: &str = "showCustomTextSelectionMenu";
        let x = call.number("x").ok_or(RelayError::MissingParameter {
            call: CALL,
            param: "x",
        })?;
        let y = call.number("y").ok_or(RelayError::MissingParameter {
            call: CALL,
            param: "y",
        })?;
        let selected_text = call
            .text("selectedText")
            .ok_or(RelayError::MissingParameter {
                call: CALL,
                param: "selectedText",
            })?;
        self.notify(Notification::MenuShown {
            success: true,
            x,
            y,
            selected_text: String::from(selected_text),
        });
        Ok(())
    }

    /// Document→native: the document reports a follow-up selection action.
    ///
    /// Requires `action` and `selectedText`; rejects naming the first missing
    /// one. On success emits [`SELECTION_ACTION`].
    pub fn handle_text_selection_action(&mut self, call: &RpcCall) -> Result<(), RelayError> {
        const CALL: &str = "handleTextSelectionAction";
        let action = call.text("action").ok_or(RelayError::MissingParameter {
            call: CALL,
            param: "action",
        })?;
        let selected_text = call
            .text("selectedText")
            .ok_or(RelayError::MissingParameter {
                call: CALL,
                param: "selectedText",
            })?;
        self.notify(Notification::Action {
            action: String::from(action),
            selected_text: String::from(selected_text),
        });
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        if let Some(listeners) = self.listeners.get_mut(notification.name()) {
            for listener in listeners.iter_mut() {
                listener(&notification);
            }
        }
    }
}

/// Completion callback that logs failures and drops successes.
fn logging_completion(what: &'static str) -> trellis_script::EvalCallback {
    Box::new(move |_, result| {
        if let Err(err) = result {
            tracing::warn!(error = err.message(), "{what} script failed");
        }
    })
}

/// The bridging script installed once per surface.
///
/// Defines the global hook: dispatch the selection event, report success.
fn install_script(hook: &str) -> String {
    format!(
        "(function() {{\n\
         \x20   window.{hook} = function(text, x, y) {{\n\
         \x20       var event = new CustomEvent('{SELECTION_EVENT}', {{\n\
         \x20           detail: {{ selectedText: text, x: x, y: y }}\n\
         \x20       }});\n\
         \x20       document.dispatchEvent(event);\n\
         \x20       return true;\n\
         \x20   }};\n\
         }})();"
    )
}

fn uninstall_script(hook: &str) -> String {
    format!("delete window.{hook};")
}

/// The delivery script for one selection: hook first, event fallback.
fn delivery_script(hook: &str, event: &SelectionEvent) -> String {
    let text = escape_text(event.selected_text());
    let (x, y) = (event.anchor().x, event.anchor().y);
    format!(
        "if (typeof window.{hook} === 'function') {{\n\
         \x20   window.{hook}(\"{text}\", {x}, {y});\n\
         }} else {{\n\
         \x20   var event = new CustomEvent('{SELECTION_EVENT}', {{\n\
         \x20       detail: {{ selectedText: \"{text}\", x: {x}, y: {y} }}\n\
         \x20   }});\n\
         \x20   document.dispatchEvent(event);\n\
         }}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::Point;
    use trellis_script::{EvalCallback, EvalQueue};

    struct QueueDoc(EvalQueue);

    impl DocumentScripting for QueueDoc {
        fn evaluate(&mut self, script: String, on_result: EvalCallback) {
            self.0.push(script, on_result);
        }
    }

    fn event(text: &str, x: f64, y: f64) -> SelectionEvent {
        SelectionEvent::new(text, Point::new(x, y), 0).unwrap()
    }

    fn collect(relay: &mut EventRelay<u32>, name: &str) -> Rc<RefCell<Vec<Notification>>> {
        let seen: Rc<RefCell<Vec<Notification>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        relay.add_listener(name, Box::new(move |n| sink.borrow_mut().push(n.clone())));
        seen
    }

    #[test]
    fn install_is_idempotent_per_surface() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let mut doc = QueueDoc(EvalQueue::new());

        assert!(relay.install_script(1, &mut doc));
        assert!(!relay.install_script(1, &mut doc));
        assert_eq!(doc.0.len(), 1, "repeat installs must not re-inject");

        let script = doc.0.pop().unwrap().script;
        assert!(script.contains(DEFAULT_HOOK));
        assert!(script.contains(SELECTION_EVENT));
        assert!(script.contains("return true"));

        // A different surface gets its own injection.
        assert!(relay.install_script(2, &mut doc));
        assert!(relay.is_installed(&1));
        assert!(relay.is_installed(&2));
    }

    #[test]
    fn uninstall_removes_the_hook_and_allows_reinstall() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let mut doc = QueueDoc(EvalQueue::new());

        assert!(!relay.uninstall_script(1, &mut doc));
        relay.install_script(1, &mut doc);
        let _ = doc.0.pop();

        assert!(relay.uninstall_script(1, &mut doc));
        let script = doc.0.pop().unwrap().script;
        assert!(script.starts_with("delete window."));
        assert!(!relay.is_installed(&1));

        assert!(relay.install_script(1, &mut doc));
    }

    #[test]
    fn forget_drops_bookkeeping_without_scripting() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let mut doc = QueueDoc(EvalQueue::new());
        relay.install_script(1, &mut doc);
        let _ = doc.0.pop();

        relay.forget(&1);
        assert!(!relay.is_installed(&1));
        assert!(doc.0.is_empty(), "forget must not evaluate anything");
    }

    #[test]
    fn deliver_evaluates_one_script_and_notifies_text_selected() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let mut doc = QueueDoc(EvalQueue::new());
        let seen = collect(&mut relay, TEXT_SELECTED);

        relay.deliver(&mut doc, &event("Hello world", 100.0, 200.0));

        assert_eq!(doc.0.len(), 1);
        let script = doc.0.pop().unwrap().script;
        assert!(script.contains("window.trellisShowSelectionMenu(\"Hello world\", 100, 200)"));
        assert!(script.contains(SELECTION_EVENT), "fallback path must dispatch the event");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            Notification::TextSelected {
                x: 100.0,
                y: 200.0,
                selected_text: "Hello world".to_string(),
            }
        );
    }

    #[test]
    fn delivered_text_is_escaped_for_the_script() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let mut doc = QueueDoc(EvalQueue::new());

        relay.deliver(&mut doc, &event("say \"hi\"\nplease", 1.0, 2.0));
        let script = doc.0.pop().unwrap().script;
        assert!(script.contains(r#"say \"hi\"\nplease"#));
    }

    #[test]
    fn custom_hook_name_is_used_in_scripts() {
        let mut relay: EventRelay<u32> = EventRelay::with_hook_name("readerShowMenu");
        let mut doc = QueueDoc(EvalQueue::new());

        relay.install_script(1, &mut doc);
        assert!(doc.0.pop().unwrap().script.contains("window.readerShowMenu"));
        relay.deliver(&mut doc, &event("t", 0.0, 0.0));
        assert!(doc.0.pop().unwrap().script.contains("window.readerShowMenu"));
    }

    #[test]
    fn menu_call_requires_all_three_parameters() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let seen = collect(&mut relay, MENU_SHOWN);

        let missing_text = RpcCall::new().with_number("x", 10.0).with_number("y", 20.0);
        let err = relay
            .show_custom_text_selection_menu(&missing_text)
            .unwrap_err();
        assert_eq!(
            err,
            RelayError::MissingParameter {
                call: "showCustomTextSelectionMenu",
                param: "selectedText",
            }
        );
        assert!(seen.borrow().is_empty(), "rejected calls must not notify");

        // Parameters are validated in declared order; x is reported first.
        let empty = RpcCall::new();
        let err = relay.show_custom_text_selection_menu(&empty).unwrap_err();
        assert_eq!(
            err,
            RelayError::MissingParameter {
                call: "showCustomTextSelectionMenu",
                param: "x",
            }
        );
    }

    #[test]
    fn menu_call_notifies_on_success() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let seen = collect(&mut relay, MENU_SHOWN);

        let call = RpcCall::new()
            .with_number("x", 10.0)
            .with_number("y", 20.0)
            .with_text("selectedText", "words");
        relay.show_custom_text_selection_menu(&call).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            Notification::MenuShown {
                success: true,
                x: 10.0,
                y: 20.0,
                selected_text: "words".to_string(),
            }
        );
    }

    #[test]
    fn action_call_validates_and_notifies() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let seen = collect(&mut relay, SELECTION_ACTION);

        let missing = RpcCall::new().with_text("action", "copy");
        let err = relay.handle_text_selection_action(&missing).unwrap_err();
        assert_eq!(
            err,
            RelayError::MissingParameter {
                call: "handleTextSelectionAction",
                param: "selectedText",
            }
        );
        assert!(seen.borrow().is_empty());

        let call = RpcCall::new()
            .with_text("action", "copy")
            .with_text("selectedText", "words");
        relay.handle_text_selection_action(&call).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            Notification::Action {
                action: "copy".to_string(),
                selected_text: "words".to_string(),
            }
        );
    }

    #[test]
    fn listeners_only_fire_for_their_name() {
        let mut relay: EventRelay<u32> = EventRelay::new();
        let mut doc = QueueDoc(EvalQueue::new());
        let menu_seen = collect(&mut relay, MENU_SHOWN);

        relay.deliver(&mut doc, &event("t", 0.0, 0.0));
        assert!(menu_seen.borrow().is_empty());
    }
}
