use super::*;

// =============================================================
// PreferenceKind
// =============================================================

#[test]
fn kind_storage_keys_match_persisted_names() {
    assert_eq!(PreferenceKind::Theme.storage_key(), "theme");
    assert_eq!(PreferenceKind::FontSize.storage_key(), "fontSize");
    assert_eq!(PreferenceKind::AnimationSpeed.storage_key(), "animationSpeed");
}

#[test]
fn kind_defaults() {
    assert_eq!(PreferenceKind::Theme.default_value(), "light");
    assert_eq!(PreferenceKind::FontSize.default_value(), "medium");
    assert_eq!(PreferenceKind::AnimationSpeed.default_value(), "normal");
}

#[test]
fn kind_parses_from_storage_key() {
    assert_eq!("fontSize".parse::<PreferenceKind>().unwrap(), PreferenceKind::FontSize);
    let err = "font-size".parse::<PreferenceKind>().unwrap_err();
    assert!(matches!(err, PreferenceError::UnknownPreference(name) if name == "font-size"));
}

// =============================================================
// Lookup tables
// =============================================================

#[test]
fn font_size_table() {
    assert_eq!(FontSize::Small.css_size(), "12px");
    assert_eq!(FontSize::Medium.css_size(), "14px");
    assert_eq!(FontSize::Large.css_size(), "15px");
}

#[test]
fn animation_speed_table() {
    assert_eq!(AnimationSpeed::Slow.duration(), "0.6s");
    assert_eq!(AnimationSpeed::Normal.duration(), "0.3s");
    assert_eq!(AnimationSpeed::Fast.duration(), "0.15s");
    assert_eq!(AnimationSpeed::Off.duration(), "0s");
}

#[test]
fn animation_speed_off_is_persisted_as_none() {
    assert_eq!(AnimationSpeed::Off.as_str(), "none");
    assert_eq!("none".parse::<AnimationSpeed>().unwrap(), AnimationSpeed::Off);
}

// =============================================================
// Validation
// =============================================================

#[test]
fn unknown_values_are_rejected_with_their_kind() {
    let err = "huge".parse::<FontSize>().unwrap_err();
    match err {
        PreferenceError::InvalidValue { kind, value } => {
            assert_eq!(kind, PreferenceKind::FontSize);
            assert_eq!(value, "huge");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!("Dark".parse::<Theme>().is_err());
    assert!("".parse::<AnimationSpeed>().is_err());
}

// =============================================================
// Theme resolution and toggle
// =============================================================

#[test]
fn auto_resolves_through_system_signal() {
    assert_eq!(Theme::Auto.resolve(Some(true)), Theme::Dark);
    assert_eq!(Theme::Auto.resolve(Some(false)), Theme::Light);
    assert_eq!(Theme::Auto.resolve(None), Theme::Light);
    assert_eq!(Theme::Dark.resolve(Some(false)), Theme::Dark);
}

#[test]
fn toggle_flips_light_and_dark() {
    assert_eq!(Theme::Light.toggled(None), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(None), Theme::Light);
    assert_eq!(Theme::Dark.toggled(Some(false)), Theme::Light);
}

#[test]
fn toggle_from_auto_flips_the_shown_appearance() {
    assert_eq!(Theme::Auto.toggled(Some(true)), Theme::Light);
    assert_eq!(Theme::Auto.toggled(Some(false)), Theme::Dark);
    assert_eq!(Theme::Auto.toggled(None), Theme::Dark);
}

// =============================================================
// Preferences snapshot
// =============================================================

#[test]
fn preferences_default_matches_kind_defaults() {
    let prefs = Preferences::default();
    for kind in PreferenceKind::ALL {
        assert_eq!(prefs.value_of(kind), kind.default_value());
    }
}

#[test]
fn preferences_serialize_with_storage_names() {
    let prefs = Preferences { theme: Theme::Auto, font_size: FontSize::Large, animation_speed: AnimationSpeed::Off };
    let json = serde_json::to_value(prefs).unwrap();
    assert_eq!(json, serde_json::json!({ "theme": "auto", "fontSize": "large", "animationSpeed": "none" }));
}

#[test]
fn serialized_values_are_the_canonical_strings() {
    for theme in [Theme::Light, Theme::Dark, Theme::Auto] {
        assert_eq!(serde_json::to_value(theme).unwrap(), theme.as_str());
    }
    for size in [FontSize::Small, FontSize::Medium, FontSize::Large] {
        assert_eq!(serde_json::to_value(size).unwrap(), size.as_str());
    }
    for speed in [AnimationSpeed::Slow, AnimationSpeed::Normal, AnimationSpeed::Fast, AnimationSpeed::Off] {
        assert_eq!(serde_json::to_value(speed).unwrap(), speed.as_str());
    }
}
