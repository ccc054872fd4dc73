//! Display preferences

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// How countries are shown in the calendar cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagDisplay {
    #[default]
    Emoji,
    Image,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Light,
    Dark,
    #[default]
    System,
}

/// User-facing display settings passed explicitly into rendering calls.
///
/// Only `week_start` has any effect on the calendar math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayPreferences {
    pub flag_display: FlagDisplay,
    /// First day of the week (0=Sunday, 6=Saturday)
    pub week_start: u8,
    pub color_scheme: ColorScheme,
    pub highlight_today: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            flag_display: FlagDisplay::default(),
            week_start: 0,
            color_scheme: ColorScheme::default(),
            highlight_today: true,
        }
    }
}

impl DisplayPreferences {
    /// Week start as a weekday, falling back to Sunday when out of range
    pub fn week_start_day(&self) -> Weekday {
        match self.week_start {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial() {
        let prefs: DisplayPreferences =
            serde_json::from_str(r#"{"weekStart": 1, "colorScheme": "dark"}"#).unwrap();
        assert_eq!(prefs.week_start, 1);
        assert_eq!(prefs.color_scheme, ColorScheme::Dark);
        assert_eq!(prefs.flag_display, FlagDisplay::Emoji);
        assert!(prefs.highlight_today);
        assert_eq!(prefs.week_start_day(), Weekday::Mon);
    }

    #[test]
    fn test_out_of_range_week_start() {
        let prefs = DisplayPreferences {
            week_start: 9,
            ..Default::default()
        };
        assert_eq!(prefs.week_start_day(), Weekday::Sun);
    }
}
