//! OS color-scheme watcher.
//!
//! One subscription per page, never removed. The callback holds only a weak
//! reference, so it goes quiet once the controller is dropped.

#[cfg(test)]
#[path = "watcher_test.rs"]
mod watcher_test;

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use crate::controller::{PreferenceController, SharedController};
use crate::document::DocumentHost;
use crate::schedule::Scheduler;
use crate::store::KeyValueStorage;

/// Callback receiving the new "prefers dark" value.
pub type SchemeHandler = Box<dyn FnMut(bool)>;

/// Source of the OS "prefers dark color scheme" signal.
pub trait ColorSchemeSignal {
    /// Current value, or `None` when the environment cannot tell.
    fn prefers_dark(&self) -> Option<bool>;
    /// Subscribe for the page lifetime. Returns `false` when unsupported.
    fn subscribe(&self, handler: SchemeHandler) -> bool;
}

/// Record the current OS preference and subscribe the controller to changes.
///
/// Returns `false` when the environment has no such signal.
pub fn watch_system_theme<D, S, T, C>(controller: &SharedController<D, S, T>, signal: &C) -> bool
where
    D: DocumentHost,
    S: KeyValueStorage + 'static,
    T: Scheduler + 'static,
    C: ColorSchemeSignal,
{
    controller.borrow_mut().set_system_dark(signal.prefers_dark());
    let weak = Rc::downgrade(controller);
    signal.subscribe(Box::new(move |dark: bool| on_scheme_change(&weak, dark)))
}

/// Register a change listener through `standard`, falling back to `legacy`
/// when it is refused. Older engines only accept `MediaQueryList.addListener`.
///
/// Returns `false` when both registrations fail.
pub fn register_with_fallback<E: Debug>(
    standard: impl FnOnce() -> Result<(), E>,
    legacy: impl FnOnce() -> Result<(), E>,
) -> bool {
    let Err(err) = standard() else {
        return true;
    };
    log::debug!("change listener refused ({err:?}); trying addListener");
    match legacy() {
        Ok(()) => true,
        Err(err) => {
            log::warn!("color scheme listener failed: {err:?}");
            false
        }
    }
}

fn on_scheme_change<D, S, T>(weak: &Weak<RefCell<PreferenceController<D, S, T>>>, dark: bool)
where
    D: DocumentHost,
    S: KeyValueStorage,
    T: Scheduler,
{
    let Some(controller) = weak.upgrade() else {
        return;
    };
    let Ok(mut controller) = controller.try_borrow_mut() else {
        log::warn!("system theme change dropped: controller busy");
        return;
    };
    controller.system_theme_changed(dark);
}

// =============================================================================
// MANUAL SIGNAL
// =============================================================================

struct SchemeState {
    dark: Option<bool>,
    supported: bool,
    handlers: Vec<SchemeHandler>,
}

/// Settable signal for native use and tests.
#[derive(Clone)]
pub struct ManualColorScheme {
    state: Rc<RefCell<SchemeState>>,
}

impl ManualColorScheme {
    #[must_use]
    pub fn new(dark: bool) -> Self {
        Self::with_state(Some(dark), true)
    }

    /// A signal for an environment without color-scheme support.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::with_state(None, false)
    }

    fn with_state(dark: Option<bool>, supported: bool) -> Self {
        Self { state: Rc::new(RefCell::new(SchemeState { dark, supported, handlers: Vec::new() })) }
    }

    /// Change the OS preference, notifying subscribers if the value changed.
    pub fn set_dark(&self, dark: bool) {
        let mut handlers = {
            let mut state = self.state.borrow_mut();
            if !state.supported || state.dark == Some(dark) {
                return;
            }
            state.dark = Some(dark);
            std::mem::take(&mut state.handlers)
        };
        for handler in &mut handlers {
            handler(dark);
        }
        let mut state = self.state.borrow_mut();
        handlers.append(&mut state.handlers);
        state.handlers = handlers;
    }

    #[must_use]
    pub fn subscribers(&self) -> usize {
        self.state.borrow().handlers.len()
    }
}

impl ColorSchemeSignal for ManualColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.state.borrow().dark
    }

    fn subscribe(&self, handler: SchemeHandler) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.supported {
            return false;
        }
        state.handlers.push(handler);
        true
    }
}
