//! Glint Services Layer
//!
//! Host-facing services around the render context. Currently settings only.

pub mod settings;

pub use settings::{LoggingSettings, Settings, SettingsError};
