//! Timeline settings loaded from a TOML file.
//!
//! The file lives in the platform config directory unless
//! `DAY_TIMELINE_CONFIG` points elsewhere. A missing file means defaults.

mod service;

pub use service::{default_database_path, parse_settings, SettingsService, CONFIG_ENV_VAR};
