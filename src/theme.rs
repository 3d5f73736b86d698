use crate::wallet::{PreferenceStore, Result};
use tracing::{debug, warn};

/// Storage key of the dark mode flag
pub const DARK_MODE_KEY: &str = "isDarkMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Persisted light/dark preference
pub struct ThemeStore<S> {
    store: S,
    current: ThemeMode,
}

impl<S: PreferenceStore> ThemeStore<S> {
    /// Read the persisted preference once; absent means light
    pub fn load(store: S) -> Self {
        let current = match Self::read_from(&store) {
            Ok(Some(dark)) => ThemeMode::from_dark(dark),
            Ok(None) => ThemeMode::Light,
            Err(e) => {
                warn!(error = %e, "Could not read theme preference");
                ThemeMode::Light
            }
        };
        debug!(?current, "Theme loaded");
        Self { store, current }
    }

    fn read_from(store: &S) -> Result<Option<bool>> {
        Ok(match store.get(DARK_MODE_KEY)?.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                warn!(value = other, "Ignoring unknown theme preference");
                None
            }
            None => None,
        })
    }

    /// Last persisted value, or `None` if nothing was stored
    pub fn read(&self) -> Result<Option<bool>> {
        Self::read_from(&self.store)
    }

    /// Flip the preference and persist the new value
    pub fn toggle(&mut self) -> Result<ThemeMode> {
        let next = self.current.toggled();
        self.store
            .set(DARK_MODE_KEY, if next.is_dark() { "true" } else { "false" })?;
        self.current = next;
        debug!(mode = ?next, "Theme toggled");
        Ok(next)
    }

    pub fn mode(&self) -> ThemeMode {
        self.current
    }
}
