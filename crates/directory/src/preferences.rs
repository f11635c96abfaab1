//! Display-mode preference.
//!
//! Process-local and volatile; seeded from whatever display mode the host
//! reports at startup and never persisted.

use std::sync::atomic::{AtomicBool, Ordering};

/// Display mode reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Holds the dark-mode flag and its toggle.
#[derive(Debug)]
pub struct ThemeState {
    dark: AtomicBool,
}

impl ThemeState {
    /// Seed the preference from the host's reported scheme.
    #[must_use]
    pub const fn new(scheme: ColorScheme) -> Self {
        Self {
            dark: AtomicBool::new(matches!(scheme, ColorScheme::Dark)),
        }
    }

    /// Whether dark mode is active.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }

    /// Flip the display mode.
    pub fn toggle(&self) {
        self.dark.fetch_xor(true, Ordering::Relaxed);
    }
}
