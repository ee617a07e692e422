//! The document surface the controller writes to.
//!
//! DESIGN
//! ======
//! `DocumentHost` is the narrow set of root-element mutations the applier
//! needs, plus lookup of the optional controls. Browser builds implement it
//! over `web_sys::Document`; `MemoryDocument` records the same effects in
//! plain maps so the controller can be exercised natively.
//!
//! Mutations are infallible to the caller. Implementations log DOM failures.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Callback receiving a control's new value after a user change.
pub type ChangeHandler = Box<dyn FnMut(String)>;

/// Root-element effects and optional control access for one document.
///
/// Implementations are cheap handles; clones address the same document.
pub trait DocumentHost: Clone + 'static {
    fn set_root_attribute(&self, name: &str, value: &str);
    fn add_root_class(&self, class: &str);
    fn remove_root_class(&self, class: &str);
    /// Set a root inline style property (custom properties included).
    fn set_root_style(&self, property: &str, value: &str);
    /// Remove the style block with `id`, if any, then insert a new one.
    fn replace_style_block(&self, id: &str, css: &str);
    /// Set a control's displayed value. Returns `false` if it is not mounted.
    fn set_control_value(&self, id: &str, value: &str) -> bool;
    /// Listen for user changes on a control. Returns `false` if it is not mounted.
    fn on_control_change(&self, id: &str, handler: ChangeHandler) -> bool;
}

// =============================================================================
// MEMORY DOCUMENT
// =============================================================================

struct Control {
    value: String,
    handler: Option<ChangeHandler>,
}

#[derive(Default)]
struct DocumentState {
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    /// `(id, css)` in insertion order.
    style_blocks: Vec<(String, String)>,
    controls: HashMap<String, Control>,
}

/// In-memory document recording every effect the controller applies.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocumentState>>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a control with an initial displayed value.
    pub fn mount_control(&self, id: &str, value: &str) {
        self.state
            .borrow_mut()
            .controls
            .insert(id.to_owned(), Control { value: value.to_owned(), handler: None });
    }

    /// Simulate a user picking `value` in a control: update it, then fire its
    /// change listener. Returns `false` if the control is not mounted.
    pub fn change_control(&self, id: &str, value: &str) -> bool {
        let handler = {
            let mut state = self.state.borrow_mut();
            let Some(control) = state.controls.get_mut(id) else {
                return false;
            };
            value.clone_into(&mut control.value);
            control.handler.take()
        };
        let Some(mut handler) = handler else {
            return true;
        };
        handler(value.to_owned());
        if let Some(control) = self.state.borrow_mut().controls.get_mut(id) {
            if control.handler.is_none() {
                control.handler = Some(handler);
            }
        }
        true
    }

    #[must_use]
    pub fn control_value(&self, id: &str) -> Option<String> {
        self.state.borrow().controls.get(id).map(|c| c.value.clone())
    }

    #[must_use]
    pub fn has_listener(&self, id: &str) -> bool {
        self.state.borrow().controls.get(id).is_some_and(|c| c.handler.is_some())
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        self.state.borrow().styles.get(property).cloned()
    }

    /// Contents of every style block carrying `id`, oldest first.
    #[must_use]
    pub fn style_blocks(&self, id: &str) -> Vec<String> {
        self.state
            .borrow()
            .style_blocks
            .iter()
            .filter(|(block_id, _)| block_id == id)
            .map(|(_, css)| css.clone())
            .collect()
    }
}

impl DocumentHost for MemoryDocument {
    fn set_root_attribute(&self, name: &str, value: &str) {
        self.state.borrow_mut().attributes.insert(name.to_owned(), value.to_owned());
    }

    fn add_root_class(&self, class: &str) {
        let mut state = self.state.borrow_mut();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_owned());
        }
    }

    fn remove_root_class(&self, class: &str) {
        self.state.borrow_mut().classes.retain(|c| c != class);
    }

    fn set_root_style(&self, property: &str, value: &str) {
        self.state.borrow_mut().styles.insert(property.to_owned(), value.to_owned());
    }

    fn replace_style_block(&self, id: &str, css: &str) {
        let mut state = self.state.borrow_mut();
        state.style_blocks.retain(|(block_id, _)| block_id != id);
        state.style_blocks.push((id.to_owned(), css.to_owned()));
    }

    fn set_control_value(&self, id: &str, value: &str) -> bool {
        match self.state.borrow_mut().controls.get_mut(id) {
            Some(control) => {
                value.clone_into(&mut control.value);
                true
            }
            None => false,
        }
    }

    fn on_control_change(&self, id: &str, handler: ChangeHandler) -> bool {
        match self.state.borrow_mut().controls.get_mut(id) {
            Some(control) => {
                control.handler = Some(handler);
                true
            }
            None => false,
        }
    }
}
