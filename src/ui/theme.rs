// SPDX-License-Identifier: MIT

//! Theme preference (light/dark) with device-local persistence.

use serde::{Deserialize, Serialize};

/// Site color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Device-local storage for the single `theme` key.
pub trait ThemeStorage {
    fn load(&self) -> Option<Theme>;
    fn save(&mut self, theme: Theme);
}

/// In-memory storage; stands in for the device's key-value store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage(Option<Theme>);

impl ThemeStorage for MemoryStorage {
    fn load(&self) -> Option<Theme> {
        self.0
    }

    fn save(&mut self, theme: Theme) {
        self.0 = Some(theme);
    }
}

/// Theme preference controller.
///
/// Initialized from the stored preference when present; otherwise derived
/// from the OS preference, persisting a derived dark choice so later loads
/// no longer consult the OS.
#[derive(Debug)]
pub struct ThemePreference<S: ThemeStorage> {
    storage: S,
    current: Theme,
}

impl<S: ThemeStorage> ThemePreference<S> {
    pub fn init(mut storage: S, os_prefers_dark: bool) -> Self {
        let current = match storage.load() {
            Some(saved) => saved,
            None if os_prefers_dark => {
                storage.save(Theme::Dark);
                Theme::Dark
            }
            None => Theme::Light,
        };
        Self { storage, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip the theme and persist the new value.
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        self.storage.save(self.current);
        self.current
    }

    /// Hand the storage back (simulated page teardown).
    pub fn into_storage(self) -> S {
        self.storage
    }
}
