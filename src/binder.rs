//! Wires the optional on-page controls to the controller.
//!
//! Each control that exists gets one change listener; missing controls are
//! skipped. A value the control offers but the preference does not know is
//! logged and the control is reset to the current value.

#[cfg(test)]
#[path = "binder_test.rs"]
mod binder_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::controller::{PreferenceController, SharedController};
use crate::document::DocumentHost;
use crate::preference::PreferenceKind;
use crate::schedule::Scheduler;
use crate::store::KeyValueStorage;

/// Attach change listeners to every mounted control and sync their values.
///
/// Returns the kinds whose control was found.
pub fn bind_controls<D, S, T>(controller: &SharedController<D, S, T>) -> Vec<PreferenceKind>
where
    D: DocumentHost,
    S: KeyValueStorage + 'static,
    T: Scheduler + 'static,
{
    let (document, controls) = {
        let c = controller.borrow();
        (c.document().clone(), c.config().controls.clone())
    };

    let mut bound = Vec::new();
    for kind in PreferenceKind::ALL {
        let id = controls.for_kind(kind);
        let weak = Rc::downgrade(controller);
        if document.on_control_change(id, Box::new(move |raw: String| on_control_change(&weak, kind, &raw))) {
            bound.push(kind);
        } else {
            log::debug!("no control #{id}; {kind} not bound");
        }
    }
    controller.borrow().sync_controls();
    bound
}

fn on_control_change<D, S, T>(weak: &Weak<RefCell<PreferenceController<D, S, T>>>, kind: PreferenceKind, raw: &str)
where
    D: DocumentHost,
    S: KeyValueStorage,
    T: Scheduler,
{
    let Some(controller) = weak.upgrade() else {
        return;
    };
    let Ok(mut controller) = controller.try_borrow_mut() else {
        log::warn!("{kind} change dropped: controller busy");
        return;
    };
    if let Err(err) = controller.apply_raw(kind, raw) {
        log::warn!("control change rejected: {err}");
        controller.sync_controls();
    }
}
