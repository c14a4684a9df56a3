//! Application Layout
//!
//! Theme preference for the authenticated shell.

use serde::Serialize;
use tracing::warn;

use crate::storage::{LocalStore, StorageError, THEME_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Persisted theme, light when unset or unreadable
pub fn load_theme(storage: &LocalStore) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(Some(value)) => Theme::parse(&value).unwrap_or_default(),
        Ok(None) => Theme::default(),
        Err(e) => {
            warn!("Failed to read theme preference: {}", e);
            Theme::default()
        }
    }
}

/// Flip the theme and persist the new choice
pub fn toggle_theme(storage: &LocalStore) -> Result<Theme, StorageError> {
    let next = load_theme(storage).toggled();
    storage.set(THEME_KEY, next.as_str())?;
    Ok(next)
}
