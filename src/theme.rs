//! Light/dark mode and brand colors.
//!
//! [`ThemeManager`] owns the theme state for one device and persists it
//! through a [`Preferences`] backend. It produces declarative output (CSS
//! variables, the `theme-color` meta value); applying it to a document is
//! the caller's job.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardDraft};
use crate::error::{Result, WorkinfoError};
use crate::preferences::Preferences;

pub const THEME_KEY: &str = "workinfo-theme";
pub const COLORS_KEY: &str = "workinfo-colors";

pub const DEFAULT_PRIMARY_LIGHT: &str = "#2563eb";
pub const DEFAULT_PRIMARY_DARK: &str = "#60a5fa";

const META_DARK: &str = "#0f172a";
const META_LIGHT: &str = "#ffffff";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ThemeMode {
    /// Value written to preferences.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Auto => "auto",
        }
    }

    /// Label shown in the theme switcher.
    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::Auto => "Auto",
        }
    }

    /// Toggle order: light -> dark -> auto -> light.
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Auto,
            ThemeMode::Auto => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = WorkinfoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "auto" => Ok(ThemeMode::Auto),
            other => Err(WorkinfoError::Config(format!("unknown theme mode {other:?}"))),
        }
    }
}

/// `#rgb` or `#rrggbb`. Colors end up in CSS, so nothing else is accepted.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

fn checked_color(value: &str) -> Result<String> {
    let value = value.trim();
    if is_hex_color(value) {
        Ok(value.to_ascii_lowercase())
    } else {
        Err(WorkinfoError::InvalidColor(value.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandColors {
    pub primary_light: String,
    pub primary_dark: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary_light: DEFAULT_PRIMARY_LIGHT.to_string(),
            primary_dark: DEFAULT_PRIMARY_DARK.to_string(),
        }
    }
}

/// Theme state for one device.
pub struct ThemeManager<P: Preferences> {
    prefs: P,
    mode: ThemeMode,
    colors: BrandColors,
}

impl<P: Preferences> ThemeManager<P> {
    /// Restores the saved mode and colors. Unreadable or invalid saved
    /// values are ignored and the defaults kept.
    pub fn load(prefs: P) -> Self {
        let mut manager = Self {
            prefs,
            mode: ThemeMode::default(),
            colors: BrandColors::default(),
        };

        match manager.prefs.get(THEME_KEY) {
            Ok(Some(saved)) => match saved.parse() {
                Ok(mode) => manager.mode = mode,
                Err(e) => tracing::warn!("Ignoring saved theme: {e}"),
            },
            Ok(None) => {}
            Err(e) => tracing::error!("Failed to read saved theme: {e}"),
        }

        match manager.prefs.get(COLORS_KEY) {
            Ok(Some(saved)) => match serde_json::from_str::<BrandColors>(&saved) {
                Ok(saved) => {
                    if let Ok(light) = checked_color(&saved.primary_light) {
                        manager.colors.primary_light = light;
                    }
                    if let Ok(dark) = checked_color(&saved.primary_dark) {
                        manager.colors.primary_dark = dark;
                    }
                }
                Err(e) => tracing::error!("Failed to parse saved colors: {e}"),
            },
            Ok(None) => {}
            Err(e) => tracing::error!("Failed to read saved colors: {e}"),
        }

        manager
    }

    /// Selected mode; [`ThemeMode::Auto`] until the user picks one.
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Current brand colors, saved or default.
    pub fn colors(&self) -> &BrandColors {
        &self.colors
    }

    /// The backend the state is persisted to.
    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    /// Saves `mode`, then applies it. On a write error the current mode is
    /// kept.
    pub fn set_mode(&mut self, mode: ThemeMode) -> Result<()> {
        self.prefs.set(THEME_KEY, mode.as_str())?;
        self.mode = mode;
        Ok(())
    }

    /// Advances to the next mode and returns it.
    pub fn toggle(&mut self) -> Result<ThemeMode> {
        let next = self.mode.next();
        self.set_mode(next)?;
        Ok(next)
    }

    /// Updates the given colors, keeping the current value for `None`.
    /// Nothing changes if either color is invalid or the write fails.
    pub fn set_colors(&mut self, light: Option<&str>, dark: Option<&str>) -> Result<()> {
        let light = light.map(checked_color).transpose()?;
        let dark = dark.map(checked_color).transpose()?;
        let mut next = self.colors.clone();
        if let Some(light) = light {
            next.primary_light = light;
        }
        if let Some(dark) = dark {
            next.primary_dark = dark;
        }
        self.commit_colors(next)
    }

    /// Restores and saves the default palette.
    pub fn reset_colors(&mut self) -> Result<()> {
        self.commit_colors(BrandColors::default())
    }

    fn commit_colors(&mut self, colors: BrandColors) -> Result<()> {
        let json =
            serde_json::to_string(&colors).map_err(|e| WorkinfoError::Preferences(Box::new(e)))?;
        self.prefs.set(COLORS_KEY, &json)?;
        self.colors = colors;
        Ok(())
    }

    /// Whether the dark palette applies, given the system preference.
    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self.mode {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::Auto => system_prefers_dark,
        }
    }

    /// Primary color for the active palette.
    pub fn primary_color(&self, system_prefers_dark: bool) -> &str {
        if self.is_dark(system_prefers_dark) {
            &self.colors.primary_dark
        } else {
            &self.colors.primary_light
        }
    }

    /// CSS custom properties for the document root.
    pub fn css_variables(&self, system_prefers_dark: bool) -> Vec<(&'static str, String)> {
        vec![
            (
                "--color-primary",
                self.primary_color(system_prefers_dark).to_string(),
            ),
            ("--color-primary-light", self.colors.primary_light.clone()),
            ("--color-primary-dark", self.colors.primary_dark.clone()),
        ]
    }

    /// Value for the `<meta name="theme-color">` tag.
    pub fn meta_theme_color(&self, system_prefers_dark: bool) -> &'static str {
        if self.is_dark(system_prefers_dark) {
            META_DARK
        } else {
            META_LIGHT
        }
    }

    /// Adopts the colors stored on a card. Empty or invalid card colors are
    /// skipped.
    pub fn load_from_card(&mut self, card: &Card) -> Result<()> {
        let pick = |value: &str| {
            if value.is_empty() {
                return None;
            }
            if is_hex_color(value.trim()) {
                Some(value.to_string())
            } else {
                tracing::warn!("Ignoring invalid card color {value:?}");
                None
            }
        };
        let light = pick(&card.theme_primary_light);
        let dark = pick(&card.theme_primary_dark);
        if light.is_none() && dark.is_none() {
            return Ok(());
        }
        self.set_colors(light.as_deref(), dark.as_deref())
    }

    /// Copies the current colors into a card form.
    pub fn colors_for_card(&self, draft: &mut CardDraft) {
        draft.theme_primary_light = self.colors.primary_light.clone();
        draft.theme_primary_dark = self.colors.primary_dark.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;

    #[test]
    fn defaults_without_saved_state() {
        let theme = ThemeManager::load(MemoryPreferences::new());
        assert_eq!(theme.mode(), ThemeMode::Auto);
        assert_eq!(theme.mode().label(), "Auto");
        assert_eq!(theme.colors(), &BrandColors::default());
    }

    #[test]
    fn toggle_cycles_and_persists() {
        let mut theme = ThemeManager::load(MemoryPreferences::new());
        theme.set_mode(ThemeMode::Light).unwrap();
        assert_eq!(theme.toggle().unwrap(), ThemeMode::Dark);
        assert_eq!(theme.toggle().unwrap(), ThemeMode::Auto);
        assert_eq!(theme.toggle().unwrap(), ThemeMode::Light);
        assert_eq!(
            theme.preferences().get(THEME_KEY).unwrap().as_deref(),
            Some("light")
        );
    }

    #[test]
    fn restores_saved_state() {
        let mut prefs = MemoryPreferences::new();
        prefs.set(THEME_KEY, "dark").unwrap();
        prefs
            .set(COLORS_KEY, r##"{"primaryLight":"#FF0000"}"##)
            .unwrap();
        let theme = ThemeManager::load(prefs);
        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert_eq!(theme.colors().primary_light, "#ff0000");
        assert_eq!(theme.colors().primary_dark, DEFAULT_PRIMARY_DARK);
    }

    #[test]
    fn ignores_corrupt_saved_state() {
        let mut prefs = MemoryPreferences::new();
        prefs.set(THEME_KEY, "sepia").unwrap();
        prefs.set(COLORS_KEY, "{not json").unwrap();
        let theme = ThemeManager::load(prefs);
        assert_eq!(theme.mode(), ThemeMode::Auto);
        assert_eq!(theme.colors(), &BrandColors::default());
    }

    #[test]
    fn dark_mode_resolution() {
        let mut theme = ThemeManager::load(MemoryPreferences::new());
        assert!(theme.is_dark(true));
        assert!(!theme.is_dark(false));
        theme.set_mode(ThemeMode::Dark).unwrap();
        assert!(theme.is_dark(false));
        assert_eq!(theme.meta_theme_color(false), "#0f172a");
        theme.set_mode(ThemeMode::Light).unwrap();
        assert!(!theme.is_dark(true));
        assert_eq!(theme.meta_theme_color(true), "#ffffff");
    }

    #[test]
    fn css_variables_follow_mode() {
        let mut theme = ThemeManager::load(MemoryPreferences::new());
        theme.set_mode(ThemeMode::Dark).unwrap();
        assert_eq!(
            theme.css_variables(false),
            vec![
                ("--color-primary", "#60a5fa".to_string()),
                ("--color-primary-light", "#2563eb".to_string()),
                ("--color-primary-dark", "#60a5fa".to_string()),
            ]
        );
    }

    #[test]
    fn set_colors_validates_both_before_applying() {
        let mut theme = ThemeManager::load(MemoryPreferences::new());
        let err = theme.set_colors(Some("#000"), Some("red;}body{x")).unwrap_err();
        assert!(matches!(err, WorkinfoError::InvalidColor(_)));
        assert_eq!(theme.colors(), &BrandColors::default());

        theme.set_colors(None, Some("#123456")).unwrap();
        assert_eq!(theme.colors().primary_light, DEFAULT_PRIMARY_LIGHT);
        assert_eq!(theme.colors().primary_dark, "#123456");

        theme.reset_colors().unwrap();
        assert_eq!(theme.colors(), &BrandColors::default());
    }

    /// Delegates to memory until `fail_writes` is set.
    #[derive(Default)]
    struct FlakyPreferences {
        inner: MemoryPreferences,
        fail_writes: bool,
    }

    impl Preferences for FlakyPreferences {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(WorkinfoError::Preferences(Box::new(std::io::Error::other(
                    "disk full",
                ))));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn failed_writes_leave_state_unchanged() {
        let mut theme = ThemeManager::load(FlakyPreferences::default());
        theme.set_mode(ThemeMode::Dark).unwrap();
        theme.set_colors(Some("#111111"), Some("#222222")).unwrap();
        let saved_colors = theme.colors().clone();

        theme.prefs.fail_writes = true;

        assert!(matches!(
            theme.set_mode(ThemeMode::Light),
            Err(WorkinfoError::Preferences(_))
        ));
        assert!(theme.toggle().is_err());
        assert_eq!(theme.mode(), ThemeMode::Dark);

        assert!(theme.set_colors(Some("#333333"), None).is_err());
        assert!(theme.reset_colors().is_err());
        assert_eq!(theme.colors(), &saved_colors);

        let card = Card {
            theme_primary_light: "#444444".into(),
            ..Card::default()
        };
        assert!(theme.load_from_card(&card).is_err());
        assert_eq!(theme.colors(), &saved_colors);

        // What is in memory still matches what a reload would see.
        let reloaded = ThemeManager::load(theme.prefs);
        assert_eq!(reloaded.mode(), ThemeMode::Dark);
        assert_eq!(reloaded.colors(), &saved_colors);
    }

    #[test]
    fn card_color_round_trip() {
        let mut theme = ThemeManager::load(MemoryPreferences::new());
        let card = Card {
            theme_primary_light: "#111111".into(),
            theme_primary_dark: "bogus".into(),
            ..Card::default()
        };
        theme.load_from_card(&card).unwrap();
        assert_eq!(theme.colors().primary_light, "#111111");
        assert_eq!(theme.colors().primary_dark, DEFAULT_PRIMARY_DARK);

        let mut draft = CardDraft::default();
        theme.colors_for_card(&mut draft);
        assert_eq!(draft.theme_primary_light, "#111111");
        assert_eq!(draft.theme_primary_dark, DEFAULT_PRIMARY_DARK);
    }

    #[test]
    fn hex_color_check() {
        assert!(is_hex_color("#abc"));
        assert!(is_hex_color("#A1B2C3"));
        assert!(!is_hex_color("abc"));
        assert!(!is_hex_color("#abcd"));
        assert!(!is_hex_color("#ggg"));
    }
}
