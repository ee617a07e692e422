use super::*;
use crate::config::ThemeConfig;
use crate::document::MemoryDocument;
use crate::preference::{AnimationSpeed, FontSize, Theme};
use crate::schedule::ManualScheduler;
use crate::store::MemoryStorage;

struct Fixture {
    doc: MemoryDocument,
    storage: MemoryStorage,
    controller: SharedController<MemoryDocument, MemoryStorage, ManualScheduler>,
}

fn fixture(config: ThemeConfig, controls: &[(&str, &str)]) -> Fixture {
    let doc = MemoryDocument::new();
    for (id, value) in controls {
        doc.mount_control(id, value);
    }
    let storage = MemoryStorage::new();
    let mut c = PreferenceController::new(config, doc.clone(), storage.clone(), ManualScheduler::new());
    c.apply_all();
    Fixture { doc, storage, controller: Rc::new(RefCell::new(c)) }
}

#[test]
fn binds_only_mounted_controls() {
    let f = fixture(ThemeConfig::default(), &[("font-size", "")]);
    let bound = bind_controls(&f.controller);
    assert_eq!(bound, vec![PreferenceKind::FontSize]);
    assert!(f.doc.has_listener("font-size"));
}

#[test]
fn binding_with_no_controls_is_not_an_error() {
    let f = fixture(ThemeConfig::default(), &[]);
    assert!(bind_controls(&f.controller).is_empty());
}

#[test]
fn binding_syncs_current_values_into_controls() {
    let f = fixture(
        ThemeConfig::default(),
        &[("change-theme", ""), ("font-size", ""), ("animation-speed", "")],
    );
    f.controller.borrow_mut().apply_animation_speed(AnimationSpeed::Off);
    bind_controls(&f.controller);
    assert_eq!(f.doc.control_value("change-theme").as_deref(), Some("light"));
    assert_eq!(f.doc.control_value("font-size").as_deref(), Some("medium"));
    assert_eq!(f.doc.control_value("animation-speed").as_deref(), Some("none"));
}

#[test]
fn control_change_applies_and_persists() {
    let f = fixture(ThemeConfig::default(), &[("change-theme", "light"), ("font-size", "medium")]);
    bind_controls(&f.controller);

    f.doc.change_control("change-theme", "dark");
    f.doc.change_control("font-size", "large");

    let c = f.controller.borrow();
    assert_eq!(c.theme(), Theme::Dark);
    assert_eq!(c.font_size(), FontSize::Large);
    assert_eq!(f.doc.attribute("data-theme").as_deref(), Some("dark"));
    assert_eq!(f.doc.style("font-size").as_deref(), Some("15px"));
    assert_eq!(f.storage.get("fontSize").as_deref(), Some("large"));
}

#[test]
fn invalid_control_value_is_rejected_and_control_reset() {
    let f = fixture(ThemeConfig::default(), &[("animation-speed", "normal")]);
    bind_controls(&f.controller);

    f.doc.change_control("animation-speed", "ludicrous");

    assert_eq!(f.controller.borrow().animation_speed(), AnimationSpeed::Normal);
    assert_eq!(f.doc.control_value("animation-speed").as_deref(), Some("normal"));
    assert_eq!(f.storage.get("animationSpeed").as_deref(), Some("normal"));
}

#[test]
fn custom_control_ids_are_used() {
    let mut config = ThemeConfig::default();
    config.controls.theme = "theme-picker".into();
    let f = fixture(config, &[("theme-picker", ""), ("change-theme", "")]);
    assert_eq!(bind_controls(&f.controller), vec![PreferenceKind::Theme]);
    assert!(f.doc.has_listener("theme-picker"));
    assert!(!f.doc.has_listener("change-theme"));
}

#[test]
fn change_after_controller_dropped_is_ignored() {
    let f = fixture(ThemeConfig::default(), &[("font-size", "medium")]);
    bind_controls(&f.controller);
    let Fixture { doc, storage, controller } = f;
    drop(controller);
    assert!(doc.change_control("font-size", "small"));
    assert_eq!(storage.get("fontSize").as_deref(), Some("medium"));
}
