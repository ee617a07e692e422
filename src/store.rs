//! Persistent key-value storage for the three preferences.
//!
//! SYSTEM CONTEXT
//! ==============
//! In the browser the backend is `localStorage`; natively it is an in-memory
//! map. When no backend is available `NullStorage` keeps the controller
//! working for the current page only.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::ThemeConfig;
use crate::error::PreferenceError;
use crate::preference::{AnimationSpeed, FontSize, Preference, PreferenceKind, Preferences, Theme};

/// Synchronous string key-value backend.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-memory backend. Clones share the same map, so a clone outlives a
/// controller the way `localStorage` outlives a page.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Backend for environments without persistent storage. Reads find nothing
/// and writes are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStorage;

impl KeyValueStorage for NullStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
        Ok(())
    }
}

/// Reads and writes the three preference keys with fixed fallback defaults.
pub struct PreferenceStore<S> {
    storage: S,
    keys: [String; 3],
}

impl<S: KeyValueStorage> PreferenceStore<S> {
    pub fn new(storage: S, config: &ThemeConfig) -> Self {
        let keys = PreferenceKind::ALL.map(|kind| config.storage_key(kind));
        Self { storage, keys }
    }

    /// Read all three preferences, substituting defaults for missing keys.
    ///
    /// A persisted value outside its domain is logged and replaced by the
    /// default; it is not rewritten until the next apply.
    pub fn load(&self) -> Preferences {
        Preferences {
            theme: self.load_one::<Theme>(),
            font_size: self.load_one::<FontSize>(),
            animation_speed: self.load_one::<AnimationSpeed>(),
        }
    }

    /// Read one preference, or its default.
    pub fn load_one<P: Preference>(&self) -> P {
        let key = self.key(P::KIND);
        let Some(raw) = self.storage.get(key) else {
            return P::default();
        };
        match raw.parse::<P>() {
            Ok(value) => value,
            Err(err) => {
                log::warn!("ignoring persisted {key}: {err}");
                P::default()
            }
        }
    }

    /// Write one preference.
    pub fn save<P: Preference>(&self, value: P) -> Result<(), PreferenceError> {
        self.storage.set(self.key(P::KIND), value.as_str())
    }

    fn key(&self, kind: PreferenceKind) -> &str {
        &self.keys[kind as usize]
    }
}
