//! Typed preference values and their fixed document lookup tables.
//!
//! DESIGN
//! ======
//! Each preference is a closed enum. Raw strings from storage or from page
//! controls are validated on the way in (`FromStr`) so the applier only ever
//! sees values it has a table entry for.

#[cfg(test)]
#[path = "preference_test.rs"]
mod preference_test;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PreferenceError;

// =============================================================================
// KIND
// =============================================================================

/// The three independent preferences managed by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreferenceKind {
    Theme,
    FontSize,
    AnimationSpeed,
}

impl PreferenceKind {
    /// All kinds, in startup application order.
    pub const ALL: [Self; 3] = [Self::Theme, Self::FontSize, Self::AnimationSpeed];

    /// Persistent storage key (also the public name of the preference).
    #[must_use]
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::FontSize => "fontSize",
            Self::AnimationSpeed => "animationSpeed",
        }
    }

    /// Raw default used when nothing is persisted.
    #[must_use]
    pub fn default_value(self) -> &'static str {
        match self {
            Self::Theme => Theme::default().as_str(),
            Self::FontSize => FontSize::default().as_str(),
            Self::AnimationSpeed => AnimationSpeed::default().as_str(),
        }
    }
}

impl fmt::Display for PreferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

impl FromStr for PreferenceKind {
    type Err = PreferenceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.storage_key() == raw)
            .ok_or_else(|| PreferenceError::UnknownPreference(raw.to_owned()))
    }
}

/// Common surface of the typed preference values.
pub trait Preference: Copy + Default + FromStr<Err = PreferenceError> {
    const KIND: PreferenceKind;

    /// Canonical string form, as persisted and shown in controls.
    fn as_str(self) -> &'static str;
}

// =============================================================================
// THEME
// =============================================================================

/// Color theme. `Auto` is written to the document unresolved; style rules
/// keyed on the attribute decide the actual appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    /// The concrete appearance, resolving `Auto` through the OS signal.
    ///
    /// An unknown signal resolves `Auto` to light.
    #[must_use]
    pub fn resolve(self, system_dark: Option<bool>) -> Self {
        match self {
            Self::Auto if system_dark == Some(true) => Self::Dark,
            Self::Auto => Self::Light,
            other => other,
        }
    }

    /// Toggle target: always `Light` or `Dark`, opposite of what is shown.
    #[must_use]
    pub fn toggled(self, system_dark: Option<bool>) -> Self {
        match self.resolve(system_dark) {
            Self::Dark => Self::Light,
            _ => Self::Dark,
        }
    }
}

impl Preference for Theme {
    const KIND: PreferenceKind = PreferenceKind::Theme;

    fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }
}

impl FromStr for Theme {
    type Err = PreferenceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" => Ok(Self::Auto),
            other => Err(PreferenceError::invalid(Self::KIND, other)),
        }
    }
}

// =============================================================================
// FONT SIZE
// =============================================================================

/// Base font size of the document root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// CSS `font-size` for the root element.
    #[must_use]
    pub fn css_size(self) -> &'static str {
        match self {
            Self::Small => "12px",
            Self::Medium => "14px",
            Self::Large => "15px",
        }
    }
}

impl Preference for FontSize {
    const KIND: PreferenceKind = PreferenceKind::FontSize;

    fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl FromStr for FontSize {
    type Err = PreferenceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(PreferenceError::invalid(Self::KIND, other)),
        }
    }
}

// =============================================================================
// ANIMATION SPEED
// =============================================================================

/// Duration of theme transitions. `Off` is persisted as `"none"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
    #[serde(rename = "none")]
    Off,
}

impl AnimationSpeed {
    /// CSS time value used for `transition-duration`.
    #[must_use]
    pub fn duration(self) -> &'static str {
        match self {
            Self::Slow => "0.6s",
            Self::Normal => "0.3s",
            Self::Fast => "0.15s",
            Self::Off => "0s",
        }
    }
}

impl Preference for AnimationSpeed {
    const KIND: PreferenceKind = PreferenceKind::AnimationSpeed;

    fn as_str(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Off => "none",
        }
    }
}

impl FromStr for AnimationSpeed {
    type Err = PreferenceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            "none" => Ok(Self::Off),
            other => Err(PreferenceError::invalid(Self::KIND, other)),
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// The three current values, as loaded from storage or held by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub font_size: FontSize,
    pub animation_speed: AnimationSpeed,
}

impl Preferences {
    /// Canonical string of the value currently held for `kind`.
    #[must_use]
    pub fn value_of(&self, kind: PreferenceKind) -> &'static str {
        match kind {
            PreferenceKind::Theme => self.theme.as_str(),
            PreferenceKind::FontSize => self.font_size.as_str(),
            PreferenceKind::AnimationSpeed => self.animation_speed.as_str(),
        }
    }
}
