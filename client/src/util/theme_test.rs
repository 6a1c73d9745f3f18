use super::*;

// =============================================================
// palettes
// =============================================================

#[test]
fn palettes_share_accents() {
    assert_eq!(LIGHT.primary, DARK.primary);
    assert_eq!(LIGHT.secondary, DARK.secondary);
    assert_ne!(LIGHT.background, DARK.background);
}

#[test]
fn dark_palette_inverts_text_and_background() {
    assert_eq!(DARK.background, LIGHT.foreground);
    assert_eq!(DARK.card, "#171a2e");
    assert_eq!(LIGHT.card, "#ffffff");
}

#[test]
fn palette_follows_mode() {
    assert_eq!(palette(ThemeMode::Dark), &DARK);
    assert_eq!(palette(ThemeMode::from_dark(false)), &LIGHT);
}

// =============================================================
// toggle
// =============================================================

#[test]
fn toggle_alternates_between_two_palettes() {
    let mut theme = ThemeState::default();
    assert_eq!(theme.palette(), &LIGHT);
    assert_eq!(theme.toggle(), &DARK);
    assert_eq!(theme.toggle(), &LIGHT);
    assert_eq!(theme.mode, ThemeMode::Light);
}

#[test]
fn mode_parses_case_insensitively() {
    assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
    assert_eq!(" light ".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
    assert!("sepia".parse::<ThemeMode>().is_err());
    assert_eq!(ThemeMode::Dark.to_string(), "dark");
}
