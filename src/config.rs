//! Names and timings used by the controller, with optional JSON overrides.
//!
//! Every field defaults to the fixed value the page stylesheet expects, so a
//! host that passes no config gets `data-theme`, `theme-transition`, and the
//! rest unchanged.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::error::PreferenceError;
use crate::preference::PreferenceKind;

pub const DEFAULT_THEME_ATTRIBUTE: &str = "data-theme";
pub const DEFAULT_TRANSITION_CLASS: &str = "theme-transition";
pub const DEFAULT_TRANSITION_MS: u32 = 300;
pub const DEFAULT_DURATION_PROPERTY: &str = "--transition-duration";
pub const DEFAULT_STYLE_BLOCK_ID: &str = "animation-speed-style";
pub const DEFAULT_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Element ids of the optional on-page controls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ControlIds {
    pub theme: String,
    pub font_size: String,
    pub animation_speed: String,
}

impl Default for ControlIds {
    fn default() -> Self {
        Self {
            theme: "change-theme".into(),
            font_size: "font-size".into(),
            animation_speed: "animation-speed".into(),
        }
    }
}

impl ControlIds {
    #[must_use]
    pub fn for_kind(&self, kind: PreferenceKind) -> &str {
        match kind {
            PreferenceKind::Theme => &self.theme,
            PreferenceKind::FontSize => &self.font_size,
            PreferenceKind::AnimationSpeed => &self.animation_speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Root attribute carrying the raw theme value.
    pub theme_attribute: String,
    /// Marker class present on the root while a theme change animates.
    pub transition_class: String,
    /// How long the marker class stays on the root.
    pub transition_ms: u32,
    /// Root custom property carrying the transition duration.
    pub duration_property: String,
    /// Id of the injected style block.
    pub style_block_id: String,
    /// Media query observed for the OS dark preference.
    pub dark_query: String,
    pub controls: ControlIds,
    /// Prepended to every storage key. Empty keeps the bare names.
    pub storage_prefix: String,
    /// `log` level filter for browser builds, `error` .. `trace` in any case.
    /// Unknown names are rejected when the config is parsed.
    pub log_level: log::Level,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            theme_attribute: DEFAULT_THEME_ATTRIBUTE.into(),
            transition_class: DEFAULT_TRANSITION_CLASS.into(),
            transition_ms: DEFAULT_TRANSITION_MS,
            duration_property: DEFAULT_DURATION_PROPERTY.into(),
            style_block_id: DEFAULT_STYLE_BLOCK_ID.into(),
            dark_query: DEFAULT_DARK_QUERY.into(),
            controls: ControlIds::default(),
            storage_prefix: String::new(),
            log_level: log::Level::Info,
        }
    }
}

impl ThemeConfig {
    /// Parse a partial JSON override; absent fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, PreferenceError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Storage key for `kind`, including the configured prefix.
    #[must_use]
    pub fn storage_key(&self, kind: PreferenceKind) -> String {
        format!("{}{}", self.storage_prefix, kind.storage_key())
    }

    /// The global rule forcing the duration on elements under the marker class.
    #[must_use]
    pub fn transition_rule(&self, duration: &str) -> String {
        format!(".{} * {{ transition-duration: {duration} !important; }}", self.transition_class)
    }
}
