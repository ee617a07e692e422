//! Browser bindings and the JS entry point.
//!
//! SYSTEM CONTEXT
//! ==============
//! Implements the controller seams over `web_sys`: `localStorage`, the live
//! document, `setTimeout` (via `gloo-timers`), and `matchMedia`. [`start`]
//! is the only entry point; it returns a [`ThemeManager`] that JS keeps for
//! the page lifetime.
//!
//! TRADE-OFFS
//! ==========
//! Listener closures are leaked with `forget()`: the subscriptions are meant
//! to last until unload, and each closure holds only a weak controller
//! reference.

use std::fmt::Display;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlSelectElement, MediaQueryList, MediaQueryListEvent, Storage};

use crate::binder;
use crate::config::ThemeConfig;
use crate::controller::{self, PreferenceController, SharedController};
use crate::document::{ChangeHandler, DocumentHost};
use crate::error::PreferenceError;
use crate::preference::{AnimationSpeed, FontSize, Preference, Theme};
use crate::schedule::{Scheduler, Task};
use crate::store::KeyValueStorage;
use crate::watcher::{self, ColorSchemeSignal, SchemeHandler};

type BrowserController = PreferenceController<WebDocument, LocalStorage, TimeoutScheduler>;

// =============================================================================
// STORAGE
// =============================================================================

/// `localStorage` backend. Without storage access (privacy mode, sandboxed
/// frames) reads find nothing and writes are dropped.
#[derive(Clone)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    #[must_use]
    pub fn open() -> Self {
        let storage = match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(Some(storage))) => Some(storage),
            Some(Err(err)) => {
                log::warn!("localStorage unavailable: {err:?}; preferences last for this page only");
                None
            }
            _ => {
                log::warn!("localStorage unavailable; preferences last for this page only");
                None
            }
        };
        Self { storage }
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("localStorage read of {key} failed: {err:?}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        storage
            .set_item(key, value)
            .map_err(|err| PreferenceError::Storage(format!("{err:?}")))
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

#[derive(Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    /// The window's document, if running in a browser window.
    #[must_use]
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    /// Whether the body is still being parsed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    /// Run `f` once on `DOMContentLoaded`.
    pub fn on_ready(&self, f: impl FnOnce() + 'static) {
        let mut pending = Some(f);
        let cb = Closure::wrap(Box::new(move || {
            if let Some(f) = pending.take() {
                f();
            }
        }) as Box<dyn FnMut()>);
        if let Err(err) = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", cb.as_ref().unchecked_ref())
        {
            log::warn!("DOMContentLoaded listener failed: {err:?}");
            return;
        }
        cb.forget();
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn control(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

/// Current value of a `<select>` or `<input>`.
fn control_value(target: &EventTarget) -> Option<String> {
    if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        return Some(select.value());
    }
    target.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::value)
}

impl DocumentHost for WebDocument {
    fn set_root_attribute(&self, name: &str, value: &str) {
        let Some(root) = self.root() else {
            return;
        };
        if let Err(err) = root.set_attribute(name, value) {
            log::warn!("set {name} failed: {err:?}");
        }
    }

    fn add_root_class(&self, class: &str) {
        let Some(root) = self.root() else {
            return;
        };
        if let Err(err) = root.class_list().add_1(class) {
            log::warn!("add class {class} failed: {err:?}");
        }
    }

    fn remove_root_class(&self, class: &str) {
        let Some(root) = self.root() else {
            return;
        };
        if let Err(err) = root.class_list().remove_1(class) {
            log::warn!("remove class {class} failed: {err:?}");
        }
    }

    fn set_root_style(&self, property: &str, value: &str) {
        let Some(root) = self.root() else {
            return;
        };
        let Some(root) = root.dyn_ref::<HtmlElement>() else {
            log::warn!("document root is not an HTML element; {property} not set");
            return;
        };
        if let Err(err) = root.style().set_property(property, value) {
            log::warn!("set style {property} failed: {err:?}");
        }
    }

    fn replace_style_block(&self, id: &str, css: &str) {
        if let Some(old) = self.document.get_element_by_id(id) {
            old.remove();
        }
        let Some(head) = self.document.head() else {
            log::warn!("no <head>; style block #{id} not inserted");
            return;
        };
        let style = match self.document.create_element("style") {
            Ok(style) => style,
            Err(err) => {
                log::warn!("create <style> failed: {err:?}");
                return;
            }
        };
        style.set_id(id);
        style.set_text_content(Some(css));
        if let Err(err) = head.append_child(&style) {
            log::warn!("insert style block #{id} failed: {err:?}");
        }
    }

    fn set_control_value(&self, id: &str, value: &str) -> bool {
        let Some(el) = self.control(id) else {
            return false;
        };
        if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else {
            log::warn!("#{id} is not a select or input");
        }
        true
    }

    fn on_control_change(&self, id: &str, mut handler: ChangeHandler) -> bool {
        let Some(el) = self.control(id) else {
            return false;
        };
        let cb = Closure::wrap(Box::new(move |event: Event| {
            if let Some(value) = event.target().as_ref().and_then(control_value) {
                handler(value);
            }
        }) as Box<dyn FnMut(Event)>);
        if let Err(err) = el.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref()) {
            log::warn!("change listener on #{id} failed: {err:?}");
            return false;
        }
        cb.forget();
        true
    }
}

// =============================================================================
// TIMERS
// =============================================================================

/// `setTimeout` scheduler. Dropping the `Timeout` handle clears the timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Task) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

// =============================================================================
// COLOR SCHEME
// =============================================================================

/// `matchMedia` signal for the configured dark-scheme query.
pub struct MediaQuerySignal {
    list: Option<MediaQueryList>,
}

impl MediaQuerySignal {
    #[must_use]
    pub fn new(query: &str) -> Self {
        let list = match web_sys::window().map(|w| w.match_media(query)) {
            Some(Ok(list)) => list,
            Some(Err(err)) => {
                log::debug!("matchMedia({query}) failed: {err:?}");
                None
            }
            None => None,
        };
        Self { list }
    }
}

impl ColorSchemeSignal for MediaQuerySignal {
    fn prefers_dark(&self) -> Option<bool> {
        self.list.as_ref().map(MediaQueryList::matches)
    }

    fn subscribe(&self, mut handler: SchemeHandler) -> bool {
        let Some(list) = &self.list else {
            return false;
        };
        let cb = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            handler(event.matches());
        }) as Box<dyn FnMut(MediaQueryListEvent)>);
        let registered = watcher::register_with_fallback(
            || list.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref()),
            || add_legacy_listener(list, &cb),
        );
        if registered {
            cb.forget();
        }
        registered
    }
}

/// `MediaQueryList.addListener`, for engines where the list is not an `EventTarget`.
#[allow(deprecated)]
fn add_legacy_listener(list: &MediaQueryList, cb: &Closure<dyn FnMut(MediaQueryListEvent)>) -> Result<(), JsValue> {
    list.add_listener_with_opt_callback(Some(cb.as_ref().unchecked_ref()))
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(level) {
        log::debug!("logger already installed: {err}");
    }
}

fn bind(controller: &SharedController<WebDocument, LocalStorage, TimeoutScheduler>) {
    let bound = binder::bind_controls(controller);
    log::info!("preference controls bound: {}", bound.len());
}

/// Start the preference controller for this page.
///
/// `config_json` overrides any [`ThemeConfig`] field. Root effects are applied
/// immediately; controls are bound now, or on `DOMContentLoaded` if the body
/// is still loading.
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> Result<ThemeManager, JsValue> {
    let config = match config_json {
        Some(raw) => ThemeConfig::from_json(&raw).map_err(to_js)?,
        None => ThemeConfig::default(),
    };
    init_logging(config.log_level);

    let document = WebDocument::current().ok_or_else(|| JsValue::from_str("no document available"))?;
    let signal = MediaQuerySignal::new(&config.dark_query);
    let controller = controller::launch(config, document.clone(), LocalStorage::open(), TimeoutScheduler, &signal);

    if document.is_loading() {
        let deferred = Rc::clone(&controller);
        document.on_ready(move || bind(&deferred));
    } else {
        bind(&controller);
    }
    Ok(ThemeManager { controller })
}

/// Handle returned to JS. Method names follow the page script API.
#[wasm_bindgen]
pub struct ThemeManager {
    controller: SharedController<WebDocument, LocalStorage, TimeoutScheduler>,
}

impl ThemeManager {
    fn with<R>(&self, f: impl FnOnce(&mut BrowserController) -> R) -> Result<R, JsValue> {
        let mut controller = self.controller.try_borrow_mut().map_err(to_js)?;
        Ok(f(&mut controller))
    }
}

#[wasm_bindgen]
impl ThemeManager {
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, theme: &str) -> Result<(), JsValue> {
        let theme: Theme = theme.parse().map_err(to_js)?;
        self.with(|c| c.set_theme(theme))
    }

    #[wasm_bindgen(js_name = getTheme)]
    pub fn get_theme(&self) -> Result<String, JsValue> {
        self.with(|c| c.theme().as_str().to_owned())
    }

    /// Returns the new theme.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> Result<String, JsValue> {
        self.with(|c| c.toggle_theme().as_str().to_owned())
    }

    /// `light` or `dark`, with `auto` resolved.
    #[wasm_bindgen(js_name = effectiveTheme)]
    pub fn effective_theme(&self) -> Result<String, JsValue> {
        self.with(|c| c.effective_theme().as_str().to_owned())
    }

    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&self, size: &str) -> Result<(), JsValue> {
        let size: FontSize = size.parse().map_err(to_js)?;
        self.with(|c| c.apply_font_size(size))
    }

    #[wasm_bindgen(js_name = getFontSize)]
    pub fn get_font_size(&self) -> Result<String, JsValue> {
        self.with(|c| c.font_size().as_str().to_owned())
    }

    #[wasm_bindgen(js_name = setAnimationSpeed)]
    pub fn set_animation_speed(&self, speed: &str) -> Result<(), JsValue> {
        let speed: AnimationSpeed = speed.parse().map_err(to_js)?;
        self.with(|c| c.apply_animation_speed(speed))
    }

    #[wasm_bindgen(js_name = getAnimationSpeed)]
    pub fn get_animation_speed(&self) -> Result<String, JsValue> {
        self.with(|c| c.animation_speed().as_str().to_owned())
    }

    /// Apply a value by preference name (`theme`, `fontSize`, `animationSpeed`).
    #[wasm_bindgen(js_name = applyRaw)]
    pub fn apply_raw(&self, name: &str, value: &str) -> Result<(), JsValue> {
        self.with(|c| c.apply_named(name, value))?.map_err(to_js)
    }

    /// All three values as a JSON object string.
    #[wasm_bindgen(js_name = getPreferences)]
    pub fn get_preferences(&self) -> Result<String, JsValue> {
        let prefs = self.with(|c| c.preferences())?;
        serde_json::to_string(&prefs).map_err(to_js)
    }
}
