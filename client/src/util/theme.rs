//! Light/dark palette selection.
//!
//! The dashboards use one of two fixed palettes. Choosing between them is a
//! pure function of the mode; [`ThemeState`] only remembers the current mode
//! for the session and never persists it.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme mode: {0:?} (expected light or dark)")]
pub struct ThemeModeError(pub String);

impl FromStr for ThemeMode {
    type Err = ThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ThemeModeError(s.to_owned())),
        }
    }
}

/// Hex colors for one mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub card: &'static str,
}

const LIGHT_BLUE: &str = "#a8d0ff";
const LIGHT_PURPLE: &str = "#c7b8ff";

pub const LIGHT: Palette = Palette {
    background: "#f7f9ff",
    foreground: "#0f1222",
    primary: LIGHT_BLUE,
    secondary: LIGHT_PURPLE,
    card: "#ffffff",
};

pub const DARK: Palette = Palette {
    background: "#0f1222",
    foreground: "#f1f3ff",
    primary: LIGHT_BLUE,
    secondary: LIGHT_PURPLE,
    card: "#171a2e",
};

#[must_use]
pub fn palette(mode: ThemeMode) -> &'static Palette {
    match mode {
        ThemeMode::Light => &LIGHT,
        ThemeMode::Dark => &DARK,
    }
}

/// Session-scoped theme mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub mode: ThemeMode,
}

impl ThemeState {
    #[must_use]
    pub fn new(mode: ThemeMode) -> Self {
        Self { mode }
    }

    /// Flip the mode and return the new palette.
    pub fn toggle(&mut self) -> &'static Palette {
        self.mode = self.mode.toggled();
        palette(self.mode)
    }

    #[must_use]
    pub fn palette(&self) -> &'static Palette {
        palette(self.mode)
    }
}
