//! Preference controller: in-memory state, the applier, and the public API.
//!
//! SYSTEM CONTEXT
//! ==============
//! One controller exists per page. It is constructed explicitly over a
//! document, a storage backend, and a scheduler, then shared through
//! [`SharedController`] with the watcher and binder callbacks.
//!
//! Every apply runs the same steps in order: document effect, in-memory
//! state, storage write, control sync. State and storage are equal once an
//! apply returns (a failed storage write is logged and leaves the page
//! running on in-memory state only).

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::binder;
use crate::config::ThemeConfig;
use crate::document::DocumentHost;
use crate::error::PreferenceError;
use crate::preference::{AnimationSpeed, FontSize, Preference, PreferenceKind, Preferences, Theme};
use crate::schedule::Scheduler;
use crate::store::{KeyValueStorage, PreferenceStore};
use crate::watcher::{self, ColorSchemeSignal};

/// The page's controller, shared with event callbacks.
pub type SharedController<D, S, T> = Rc<RefCell<PreferenceController<D, S, T>>>;

pub struct PreferenceController<D, S, T: Scheduler> {
    config: ThemeConfig,
    document: D,
    store: PreferenceStore<S>,
    scheduler: T,
    state: Preferences,
    /// Last observed OS dark preference; `None` until known.
    system_dark: Option<bool>,
    /// Pending removal of the transition marker. Replacing it cancels the old one.
    transition: Option<T::Handle>,
    /// Set while the marker is on the root; cleared by the removal task.
    marker_on: Rc<Cell<bool>>,
}

impl<D, S, T> PreferenceController<D, S, T>
where
    D: DocumentHost,
    S: KeyValueStorage,
    T: Scheduler,
{
    /// Load persisted preferences. Nothing is applied until [`Self::apply_all`].
    pub fn new(config: ThemeConfig, document: D, storage: S, scheduler: T) -> Self {
        let store = PreferenceStore::new(storage, &config);
        let state = store.load();
        Self {
            config,
            document,
            store,
            scheduler,
            state,
            system_dark: None,
            transition: None,
            marker_on: Rc::default(),
        }
    }

    // --- Startup ---

    /// Apply all three current values to the document.
    pub fn apply_all(&mut self) {
        let Preferences { theme, font_size, animation_speed } = self.state;
        self.apply_theme(theme);
        self.apply_font_size(font_size);
        self.apply_animation_speed(animation_speed);
    }

    /// Write every current value into its control, where mounted.
    pub fn sync_controls(&self) {
        for kind in PreferenceKind::ALL {
            self.sync_control(kind);
        }
    }

    // --- Applier ---

    /// Set the theme attribute to the raw value and run the transition marker.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.document.add_root_class(&self.config.transition_class);
        self.document.set_root_attribute(&self.config.theme_attribute, theme.as_str());
        self.state.theme = theme;
        self.persist(theme);
        self.schedule_transition_end();
        self.sync_control(PreferenceKind::Theme);
        log::debug!("theme applied: {}", theme.as_str());
    }

    /// Set the root base font size.
    pub fn apply_font_size(&mut self, size: FontSize) {
        self.document.set_root_style("font-size", size.css_size());
        self.state.font_size = size;
        self.persist(size);
        self.sync_control(PreferenceKind::FontSize);
        log::debug!("font size applied: {} ({})", size.as_str(), size.css_size());
    }

    /// Set the duration custom property and replace the global transition rule.
    pub fn apply_animation_speed(&mut self, speed: AnimationSpeed) {
        let duration = speed.duration();
        self.document.set_root_style(&self.config.duration_property, duration);
        self.document
            .replace_style_block(&self.config.style_block_id, &self.config.transition_rule(duration));
        self.state.animation_speed = speed;
        self.persist(speed);
        self.sync_control(PreferenceKind::AnimationSpeed);
        log::debug!("animation speed applied: {} ({duration})", speed.as_str());
    }

    /// Validate a raw value for `kind` and apply it.
    pub fn apply_raw(&mut self, kind: PreferenceKind, raw: &str) -> Result<(), PreferenceError> {
        match kind {
            PreferenceKind::Theme => self.apply_theme(raw.parse()?),
            PreferenceKind::FontSize => self.apply_font_size(raw.parse()?),
            PreferenceKind::AnimationSpeed => self.apply_animation_speed(raw.parse()?),
        }
        Ok(())
    }

    /// Like [`Self::apply_raw`], addressing the preference by its storage name.
    pub fn apply_named(&mut self, name: &str, raw: &str) -> Result<(), PreferenceError> {
        self.apply_raw(name.parse()?, raw)
    }

    // --- Public API ---

    pub fn set_theme(&mut self, theme: Theme) {
        self.apply_theme(theme);
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    /// Switch between light and dark.
    ///
    /// From `Auto` the target is the opposite of the appearance currently
    /// shown, so the page visibly changes and `Auto` is left behind.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.state.theme.toggled(self.system_dark);
        self.apply_theme(next);
        next
    }

    /// The theme as displayed, with `Auto` resolved through the OS signal.
    #[must_use]
    pub fn effective_theme(&self) -> Theme {
        self.state.theme.resolve(self.system_dark)
    }

    #[must_use]
    pub fn font_size(&self) -> FontSize {
        self.state.font_size
    }

    #[must_use]
    pub fn animation_speed(&self) -> AnimationSpeed {
        self.state.animation_speed
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.state
    }

    // --- OS signal ---

    /// Record the OS preference without applying anything.
    pub fn set_system_dark(&mut self, dark: Option<bool>) {
        self.system_dark = dark;
    }

    /// OS dark preference changed. Only an `Auto` theme is re-applied.
    pub fn system_theme_changed(&mut self, dark: bool) {
        self.system_dark = Some(dark);
        if self.state.theme == Theme::Auto {
            log::debug!("system theme changed (dark={dark}); re-applying auto");
            self.apply_theme(Theme::Auto);
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Whether a transition marker removal is still waiting to run.
    #[must_use]
    pub fn has_pending_transition(&self) -> bool {
        self.marker_on.get()
    }

    // --- Internals ---

    fn persist<P: Preference>(&self, value: P) {
        if let Err(err) = self.store.save(value) {
            log::warn!("{} not persisted: {err}", P::KIND);
        }
    }

    fn sync_control(&self, kind: PreferenceKind) {
        let id = self.config.controls.for_kind(kind);
        if !self.document.set_control_value(id, self.state.value_of(kind)) {
            log::trace!("no control #{id} for {kind}");
        }
    }

    fn schedule_transition_end(&mut self) {
        // Cancel first so at most one removal is ever pending.
        self.transition = None;
        let document = self.document.clone();
        let class = self.config.transition_class.clone();
        let marker_on = Rc::clone(&self.marker_on);
        marker_on.set(true);
        let handle = self.scheduler.schedule(
            self.config.transition_ms,
            Box::new(move || {
                marker_on.set(false);
                document.remove_root_class(&class);
            }),
        );
        self.transition = Some(handle);
    }
}

/// Construct the controller, apply loaded values, and register the watcher.
///
/// Controls are not bound; see [`start`] or [`binder::bind_controls`].
pub fn launch<D, S, T, C>(
    config: ThemeConfig,
    document: D,
    storage: S,
    scheduler: T,
    signal: &C,
) -> SharedController<D, S, T>
where
    D: DocumentHost,
    S: KeyValueStorage + 'static,
    T: Scheduler + 'static,
    C: ColorSchemeSignal,
{
    let mut controller = PreferenceController::new(config, document, storage, scheduler);
    let loaded = controller.preferences();
    log::info!(
        "preferences loaded: theme={} fontSize={} animationSpeed={}",
        loaded.theme.as_str(),
        loaded.font_size.as_str(),
        loaded.animation_speed.as_str()
    );
    controller.apply_all();
    let shared = Rc::new(RefCell::new(controller));
    if !watcher::watch_system_theme(&shared, signal) {
        log::debug!("system color scheme signal unavailable");
    }
    shared
}

/// Full startup: [`launch`] followed by control binding.
pub fn start<D, S, T, C>(
    config: ThemeConfig,
    document: D,
    storage: S,
    scheduler: T,
    signal: &C,
) -> SharedController<D, S, T>
where
    D: DocumentHost,
    S: KeyValueStorage + 'static,
    T: Scheduler + 'static,
    C: ColorSchemeSignal,
{
    let shared = launch(config, document, storage, scheduler, signal);
    let bound = binder::bind_controls(&shared);
    log::info!("preference controller started ({} controls bound)", bound.len());
    shared
}
