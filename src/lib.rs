//! Page preference controller for theme, font size, and animation speed.
//!
//! Compiled to WebAssembly with the `hydrate` feature, where `web::start`
//! wires the controller to the live document. Without the feature the same
//! controller runs natively over the in-memory implementations, which is how
//! it is tested.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`preference`] | Typed preference values and their lookup tables |
//! | [`store`] | Persistent key-value storage with defaults |
//! | [`controller`] | State, the applier, and the public API |
//! | [`watcher`] | OS color-scheme subscription |
//! | [`binder`] | Optional on-page control wiring |
//! | [`document`] | Document effects seam and in-memory document |
//! | [`schedule`] | Cancellable deferred tasks |
//! | [`config`] | Fixed names and timings, overridable from JSON |
//! | [`error`] | Crate error type |
//! | `web` | Browser implementations and the JS entry point (`hydrate`) |

pub mod binder;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod preference;
pub mod schedule;
pub mod store;
pub mod watcher;

#[cfg(feature = "hydrate")]
pub mod web;

pub use config::ThemeConfig;
pub use controller::{PreferenceController, SharedController};
pub use error::PreferenceError;
pub use preference::{AnimationSpeed, FontSize, Preference, PreferenceKind, Preferences, Theme};
